// crates/cse-config/src/config.rs
// ============================================================================
// Module: CSE Configuration
// Description: Configuration loading and validation for the CSE server.
// Purpose: Provide strict config parsing with accumulated error reporting.
// Dependencies: serde, serde_yaml, thiserror, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a YAML file (`config.yaml`) with strict size
//! and path limits. Loading is two-phase: the raw bytes are parsed into a
//! generic YAML value, then every field is extracted with its declared type
//! while failures accumulate into one [`ValidationReport`]. The operator sees
//! every problem in a single pass instead of fixing the file error by error.
//!
//! Loading is a pure parse-and-validate step. Nothing here connects to the
//! message broker or the vCD API; the record is handed to the server before
//! any connection is attempted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;
use url::Url;

use crate::policy::SequencePolicy;
use crate::policy::ValidationPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "config.yaml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CSE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Literal sentinel marking fields the operator must fill in before use.
pub const PLACEHOLDER: &str = "CHANGE_ME";
/// Accepted names for `broker.ip_allocation_mode`.
pub(crate) const IP_ALLOCATION_MODES: [&str; 2] = ["pool", "dhcp"];
/// Minimum number of request listeners.
pub(crate) const MIN_LISTENERS: u32 = 1;
/// Maximum number of request listeners.
pub(crate) const MAX_LISTENERS: u32 = 128;
/// Minimum virtual CPU count for a template.
pub(crate) const MIN_TEMPLATE_CPU: u32 = 1;
/// Minimum template memory in megabytes.
pub(crate) const MIN_TEMPLATE_MEM_MB: u32 = 1;
/// Expected length of a hex-encoded SHA-256 digest.
pub(crate) const SHA256_HEX_LENGTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// CSE server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CseConfig {
    /// Test-harness teardown and coverage flags.
    pub test: TestConfig,
    /// AMQP endpoint the server consumes requests from.
    pub amqp: AmqpConfig,
    /// vCloud Director API endpoint and credentials.
    pub vcd: VcdConfig,
    /// Backing vCenter cells, in document order.
    pub vcs: Vec<VcsEntry>,
    /// Server runtime tuning.
    pub service: ServiceConfig,
    /// Template catalog and provisioning parameters.
    pub broker: BrokerConfig,
}

impl CseConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: Option<&Path>, policy: &ValidationPolicy) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Io("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::MalformedDocument("config file must be utf-8".to_string()))?;
        Self::from_yaml_str(content, policy)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedDocument`] when the text is not YAML
    /// and [`ConfigError::Invalid`] with the full report otherwise.
    pub fn from_yaml_str(text: &str, policy: &ValidationPolicy) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(text)
            .map_err(|err| ConfigError::MalformedDocument(err.to_string()))?;
        Self::from_value(&doc, policy)
    }

    /// Extracts and validates configuration from a parsed YAML value.
    ///
    /// Every field failure is accumulated; the returned report covers the
    /// whole document rather than the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document shape or any field is invalid.
    pub fn from_value(doc: &Value, policy: &ValidationPolicy) -> Result<Self, ConfigError> {
        if !matches!(doc, Value::Mapping(_) | Value::Null) {
            return Err(ConfigError::MalformedDocument(format!(
                "top-level document must be a mapping, found {}",
                yaml_type_name(doc)
            )));
        }
        let mut report = ValidationReport::new();
        let test = TestConfig::from_section(section_fields(doc, "test", &mut report), &mut report);
        let amqp = AmqpConfig::from_section(section_fields(doc, "amqp", &mut report), &mut report);
        let vcd = VcdConfig::from_section(section_fields(doc, "vcd", &mut report), &mut report);
        let vcs = vcs_from_document(doc, policy, &mut report);
        let service =
            ServiceConfig::from_section(section_fields(doc, "service", &mut report), &mut report);
        let broker = BrokerConfig::from_section(
            section_fields(doc, "broker", &mut report),
            policy,
            &mut report,
        );
        let config = Self {
            test,
            amqp,
            vcd,
            vcs,
            service,
            broker,
        };
        report.into_result()?;
        Ok(config)
    }

    /// Serializes the record back to YAML.
    ///
    /// Re-loading the output yields an equal record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the emitter fails.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|err| ConfigError::Io(err.to_string()))
    }

    /// Validates an in-memory record with the same rules the loader applies.
    ///
    /// Programmatically constructed records get the same accumulated report
    /// surface as documents loaded from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] with the full report on any failure.
    pub fn validate(&self, policy: &ValidationPolicy) -> Result<(), ConfigError> {
        let mut report = ValidationReport::new();
        self.amqp.validate(&mut report);
        self.vcd.validate(&mut report);
        check_sequence_len(&mut report, "vcs", self.vcs.len(), policy.empty_vcs);
        for (index, entry) in self.vcs.iter().enumerate() {
            entry.validate(index, &mut report);
        }
        self.service.validate(&mut report);
        self.broker.validate(policy, &mut report);
        report.into_result()
    }
}

/// Flags consumed by the external test harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestConfig {
    /// Tear down installation entities after the run.
    pub teardown_installation: bool,
    /// Tear down clusters created during the run.
    pub teardown_clusters: bool,
    /// Exercise every template instead of the default one.
    pub test_all_templates: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            teardown_installation: default_teardown_installation(),
            teardown_clusters: default_teardown_clusters(),
            test_all_templates: default_test_all_templates(),
        }
    }
}

impl TestConfig {
    /// Extracts the `test` section, applying defaults for absent fields.
    fn from_section(section: Option<&Value>, report: &mut ValidationReport) -> Self {
        Self {
            teardown_installation: optional_bool(
                section,
                "test",
                "teardown_installation",
                default_teardown_installation(),
                report,
            ),
            teardown_clusters: optional_bool(
                section,
                "test",
                "teardown_clusters",
                default_teardown_clusters(),
                report,
            ),
            test_all_templates: optional_bool(
                section,
                "test",
                "test_all_templates",
                default_test_all_templates(),
                report,
            ),
        }
    }
}

/// AMQP endpoint parameters for the request exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmqpConfig {
    /// Broker hostname. Required; the sample ships the placeholder.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Prefix applied to queue names owned by this deployment.
    pub prefix: String,
    /// Broker login user.
    pub username: String,
    /// Broker login password.
    pub password: String,
    /// Exchange the server binds to.
    pub exchange: String,
    /// Routing key for request messages.
    pub routing_key: String,
    /// Connect over TLS.
    pub ssl: bool,
    /// Accept any broker certificate when TLS is enabled.
    pub ssl_accept_all: bool,
    /// AMQP virtual host.
    pub vhost: String,
}

impl Default for AmqpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_amqp_port(),
            prefix: default_amqp_prefix().to_string(),
            username: String::new(),
            password: String::new(),
            exchange: default_amqp_exchange().to_string(),
            routing_key: default_amqp_routing_key().to_string(),
            ssl: default_amqp_ssl(),
            ssl_accept_all: default_amqp_ssl_accept_all(),
            vhost: default_amqp_vhost().to_string(),
        }
    }
}

impl AmqpConfig {
    /// Extracts the `amqp` section, accumulating field failures.
    fn from_section(section: Option<&Value>, report: &mut ValidationReport) -> Self {
        Self {
            host: required_string(section, "amqp", "host", report),
            port: optional_port(section, "amqp", "port", default_amqp_port(), report),
            prefix: optional_string(section, "amqp", "prefix", default_amqp_prefix(), report),
            username: required_string(section, "amqp", "username", report),
            password: required_string(section, "amqp", "password", report),
            exchange: optional_string(section, "amqp", "exchange", default_amqp_exchange(), report),
            routing_key: optional_string(
                section,
                "amqp",
                "routing_key",
                default_amqp_routing_key(),
                report,
            ),
            ssl: optional_bool(section, "amqp", "ssl", default_amqp_ssl(), report),
            ssl_accept_all: optional_bool(
                section,
                "amqp",
                "ssl_accept_all",
                default_amqp_ssl_accept_all(),
                report,
            ),
            vhost: optional_string(section, "amqp", "vhost", default_amqp_vhost(), report),
        }
    }

    /// Validates an in-memory `amqp` section.
    fn validate(&self, report: &mut ValidationReport) {
        check_filled(report, "amqp.host", &self.host);
        check_port(report, "amqp.port", self.port);
        check_filled(report, "amqp.username", &self.username);
        check_filled(report, "amqp.password", &self.password);
    }
}

/// vCloud Director API endpoint parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcdConfig {
    /// vCD hostname. Required; the sample ships the placeholder.
    pub host: String,
    /// vCD API port.
    pub port: u16,
    /// System administrator user.
    pub username: String,
    /// System administrator password.
    pub password: String,
    /// Pinned vCD API version string (e.g. `"29.0"`).
    pub api_version: String,
    /// Verify the vCD TLS certificate.
    pub verify: bool,
    /// Log API request and response bodies to the server log.
    pub log: bool,
}

impl Default for VcdConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_vcd_port(),
            username: String::new(),
            password: String::new(),
            api_version: String::new(),
            verify: default_vcd_verify(),
            log: default_vcd_log(),
        }
    }
}

impl VcdConfig {
    /// Extracts the `vcd` section, accumulating field failures.
    fn from_section(section: Option<&Value>, report: &mut ValidationReport) -> Self {
        Self {
            host: required_string(section, "vcd", "host", report),
            port: optional_port(section, "vcd", "port", default_vcd_port(), report),
            username: required_string(section, "vcd", "username", report),
            password: required_string(section, "vcd", "password", report),
            api_version: required_string(section, "vcd", "api_version", report),
            verify: optional_bool(section, "vcd", "verify", default_vcd_verify(), report),
            log: optional_bool(section, "vcd", "log", default_vcd_log(), report),
        }
    }

    /// Validates an in-memory `vcd` section.
    fn validate(&self, report: &mut ValidationReport) {
        check_filled(report, "vcd.host", &self.host);
        check_port(report, "vcd.port", self.port);
        check_filled(report, "vcd.username", &self.username);
        check_filled(report, "vcd.password", &self.password);
        check_filled(report, "vcd.api_version", &self.api_version);
    }
}

/// Credentials for one backing vCenter cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsEntry {
    /// Cell name as registered in vCD.
    pub name: String,
    /// vCenter login user.
    pub username: String,
    /// vCenter login password.
    pub password: String,
    /// Verify the vCenter TLS certificate.
    pub verify: bool,
}

impl Default for VcsEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            username: String::new(),
            password: String::new(),
            verify: default_vcs_verify(),
        }
    }
}

impl VcsEntry {
    /// Extracts one `vcs` entry, accumulating field failures under `prefix`.
    fn from_section(section: Option<&Value>, prefix: &str, report: &mut ValidationReport) -> Self {
        Self {
            name: required_string(section, prefix, "name", report),
            username: required_string(section, prefix, "username", report),
            password: required_string(section, prefix, "password", report),
            verify: optional_bool(section, prefix, "verify", default_vcs_verify(), report),
        }
    }

    /// Validates an in-memory `vcs` entry at `index`.
    fn validate(&self, index: usize, report: &mut ValidationReport) {
        check_filled(report, &format!("vcs[{index}].name"), &self.name);
        check_filled(report, &format!("vcs[{index}].username"), &self.username);
        check_filled(report, &format!("vcs[{index}].password"), &self.password);
    }
}

/// Runtime tuning for the consuming server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    /// Number of concurrent request listeners.
    pub listeners: u32,
    /// Require vCD rights grants before serving cluster operations.
    pub enforce_authorization: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listeners: default_listeners(),
            enforce_authorization: default_enforce_authorization(),
        }
    }
}

impl ServiceConfig {
    /// Extracts the `service` section, applying defaults for absent fields.
    fn from_section(section: Option<&Value>, report: &mut ValidationReport) -> Self {
        Self {
            listeners: optional_u32_in_range(
                section,
                "service",
                "listeners",
                default_listeners(),
                MIN_LISTENERS,
                MAX_LISTENERS,
                report,
            ),
            enforce_authorization: optional_bool(
                section,
                "service",
                "enforce_authorization",
                default_enforce_authorization(),
                report,
            ),
        }
    }

    /// Validates an in-memory `service` section.
    fn validate(&self, report: &mut ValidationReport) {
        check_range_u32(report, "service.listeners", self.listeners, MIN_LISTENERS, MAX_LISTENERS);
    }
}

/// IP allocation mode for temporary vApp networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IpAllocationMode {
    /// Allocate addresses from the network's static pool.
    #[default]
    Pool,
    /// Lease addresses over DHCP.
    Dhcp,
}

impl IpAllocationMode {
    /// Parses a document-supplied mode name.
    fn parse(value: &str) -> Option<Self> {
        match value {
            "pool" => Some(Self::Pool),
            "dhcp" => Some(Self::Dhcp),
            _ => None,
        }
    }

    /// Returns the canonical document name for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pool => "pool",
            Self::Dhcp => "dhcp",
        }
    }
}

/// Template catalog and provisioning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerConfig {
    /// Organization owning the catalog and build vApps.
    pub org: String,
    /// Virtual data center used for template builds.
    pub vdc: String,
    /// Catalog holding published template items.
    pub catalog: String,
    /// Org VDC network used during template builds.
    pub network: String,
    /// IP allocation mode for build networks.
    pub ip_allocation_mode: IpAllocationMode,
    /// Storage profile for build vApps (`*` selects any).
    pub storage_profile: String,
    /// Name of the template used when a request names none.
    pub default_template: String,
    /// Buildable VM templates, in document order.
    pub templates: Vec<TemplateConfig>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            vdc: String::new(),
            catalog: default_broker_catalog().to_string(),
            network: String::new(),
            ip_allocation_mode: default_ip_allocation_mode(),
            storage_profile: default_storage_profile().to_string(),
            default_template: String::new(),
            templates: Vec::new(),
        }
    }
}

impl BrokerConfig {
    /// Extracts the `broker` section, accumulating field failures.
    fn from_section(
        section: Option<&Value>,
        policy: &ValidationPolicy,
        report: &mut ValidationReport,
    ) -> Self {
        Self {
            org: required_string(section, "broker", "org", report),
            vdc: required_string(section, "broker", "vdc", report),
            catalog: optional_string(
                section,
                "broker",
                "catalog",
                default_broker_catalog(),
                report,
            ),
            network: required_string(section, "broker", "network", report),
            ip_allocation_mode: optional_allocation_mode(section, "broker", report),
            storage_profile: optional_string(
                section,
                "broker",
                "storage_profile",
                default_storage_profile(),
                report,
            ),
            default_template: required_string(section, "broker", "default_template", report),
            templates: templates_from_section(section, policy, report),
        }
    }

    /// Validates an in-memory `broker` section.
    fn validate(&self, policy: &ValidationPolicy, report: &mut ValidationReport) {
        check_filled(report, "broker.org", &self.org);
        check_filled(report, "broker.vdc", &self.vdc);
        check_filled(report, "broker.network", &self.network);
        check_filled(report, "broker.default_template", &self.default_template);
        check_sequence_len(
            report,
            "broker.templates",
            self.templates.len(),
            policy.empty_templates,
        );
        for (index, template) in self.templates.iter().enumerate() {
            template.validate(&format!("broker.templates[{index}]"), report);
        }
    }
}

/// One buildable VM template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateConfig {
    /// Template name requests refer to.
    pub name: String,
    /// Catalog item the build publishes.
    pub catalog_item: String,
    /// Download URL of the source OVA.
    pub source_ova: String,
    /// Filename the source OVA is stored under.
    pub source_ova_name: String,
    /// Expected SHA-256 digest of the source OVA, hex encoded.
    pub sha256_ova: String,
    /// Name of the temporary vApp used during the build.
    pub temp_vapp: String,
    /// Delete the temporary vApp after capture.
    pub cleanup: bool,
    /// Virtual CPU count for instantiated nodes.
    pub cpu: u32,
    /// Memory in megabytes for instantiated nodes.
    pub mem: u32,
    /// Guest OS administrator password set during the build.
    pub admin_password: String,
    /// Human-readable description published with the catalog item.
    pub description: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            catalog_item: String::new(),
            source_ova: String::new(),
            source_ova_name: String::new(),
            sha256_ova: String::new(),
            temp_vapp: String::new(),
            cleanup: default_template_cleanup(),
            cpu: MIN_TEMPLATE_CPU,
            mem: MIN_TEMPLATE_MEM_MB,
            admin_password: String::new(),
            description: String::new(),
        }
    }
}

impl TemplateConfig {
    /// Extracts one template entry, accumulating field failures under `prefix`.
    fn from_section(section: Option<&Value>, prefix: &str, report: &mut ValidationReport) -> Self {
        let name = required_string(section, prefix, "name", report);
        let catalog_item = required_string(section, prefix, "catalog_item", report);
        let source_ova = required_string(section, prefix, "source_ova", report);
        check_source_url(report, &format!("{prefix}.source_ova"), &source_ova);
        let source_ova_name = required_string(section, prefix, "source_ova_name", report);
        let sha256_ova = required_string(section, prefix, "sha256_ova", report);
        check_sha256(report, &format!("{prefix}.sha256_ova"), &sha256_ova);
        let temp_vapp = required_string(section, prefix, "temp_vapp", report);
        let cleanup = optional_bool(section, prefix, "cleanup", default_template_cleanup(), report);
        let cpu = required_u32_min(section, prefix, "cpu", MIN_TEMPLATE_CPU, report);
        let mem = required_u32_min(section, prefix, "mem", MIN_TEMPLATE_MEM_MB, report);
        let admin_password = required_string(section, prefix, "admin_password", report);
        let description = optional_string(section, prefix, "description", "", report);
        Self {
            name,
            catalog_item,
            source_ova,
            source_ova_name,
            sha256_ova,
            temp_vapp,
            cleanup,
            cpu,
            mem,
            admin_password,
            description,
        }
    }

    /// Validates an in-memory template entry under `prefix`.
    fn validate(&self, prefix: &str, report: &mut ValidationReport) {
        check_filled(report, &format!("{prefix}.name"), &self.name);
        check_filled(report, &format!("{prefix}.catalog_item"), &self.catalog_item);
        check_filled(report, &format!("{prefix}.source_ova"), &self.source_ova);
        check_source_url(report, &format!("{prefix}.source_ova"), &self.source_ova);
        check_filled(report, &format!("{prefix}.source_ova_name"), &self.source_ova_name);
        check_filled(report, &format!("{prefix}.sha256_ova"), &self.sha256_ova);
        check_sha256(report, &format!("{prefix}.sha256_ova"), &self.sha256_ova);
        check_filled(report, &format!("{prefix}.temp_vapp"), &self.temp_vapp);
        check_min_u32(report, &format!("{prefix}.cpu"), self.cpu, MIN_TEMPLATE_CPU);
        check_min_u32(report, &format!("{prefix}.mem"), self.mem, MIN_TEMPLATE_MEM_MB);
        check_filled(report, &format!("{prefix}.admin_password"), &self.admin_password);
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field without a default is absent, empty, or still the placeholder.
    #[error("missing required field `{field}`: {detail}")]
    MissingRequiredField {
        /// Dotted path of the offending field.
        field: String,
        /// Human-readable cause.
        detail: String,
    },
    /// A constrained field holds a value outside its accepted set.
    #[error("invalid value for field `{field}`: `{value}` is not one of {allowed}")]
    InvalidEnumValue {
        /// Dotted path of the offending field.
        field: String,
        /// Rejected document value.
        value: String,
        /// Comma-joined accepted names.
        allowed: String,
    },
    /// A field's value cannot be coerced to its declared type or range.
    #[error("invalid type for field `{field}`: {detail}")]
    InvalidType {
        /// Dotted path of the offending field.
        field: String,
        /// Expected and observed shape.
        detail: String,
    },
}

impl ValidationError {
    /// Builds a missing-required-field error.
    fn missing(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Builds an invalid-enum error listing the accepted names.
    fn invalid_enum(field: impl Into<String>, value: impl Into<String>, allowed: &[&str]) -> Self {
        Self::InvalidEnumValue {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Builds an invalid-type error.
    fn invalid_type(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidType {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Returns the dotted path of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequiredField {
                field, ..
            }
            | Self::InvalidEnumValue {
                field, ..
            }
            | Self::InvalidType {
                field, ..
            } => field,
        }
    }
}

/// Ordered accumulation of validation failures for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Collected failures in canonical section order.
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
        }
    }

    /// Appends one failure to the report.
    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true when no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the recorded failures in order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        self.errors.as_slice()
    }

    /// Converts the report into a loader result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] carrying `self` when non-empty.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() { Ok(()) } else { Err(ConfigError::Invalid(self)) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading or writing configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// The raw bytes do not parse as a YAML mapping document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// One or more field-level validation failures.
    #[error("invalid config:\n{0}")]
    Invalid(ValidationReport),
}

impl ConfigError {
    /// Returns the validation report when this error carries one.
    #[must_use]
    pub const fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::Io(_) | Self::MalformedDocument(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Extraction Helpers
// ============================================================================

/// Resolves a named top-level section to its mapping value.
///
/// Absent and null sections resolve to `None`; a present non-mapping section
/// records an invalid-type failure and also resolves to `None`.
fn section_fields<'a>(
    doc: &'a Value,
    name: &str,
    report: &mut ValidationReport,
) -> Option<&'a Value> {
    match doc.get(name) {
        None => None,
        Some(value) if value.is_null() => None,
        Some(value @ Value::Mapping(_)) => Some(value),
        Some(other) => {
            report.push(ValidationError::invalid_type(
                name,
                format!("expected mapping, found {}", yaml_type_name(other)),
            ));
            None
        }
    }
}

/// Looks up a field inside a section, treating null as absent.
fn lookup_field<'a>(section: Option<&'a Value>, field: &str) -> Option<&'a Value> {
    section.and_then(|value| value.get(field)).filter(|value| !value.is_null())
}

/// Extracts a required string field.
///
/// Absence, a non-string value, an empty value, and the placeholder sentinel
/// each record exactly one failure. The returned value is only meaningful
/// when the report stays clean.
fn required_string(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    report: &mut ValidationReport,
) -> String {
    let path = format!("{prefix}.{field}");
    match lookup_field(section, field) {
        None => {
            report.push(ValidationError::missing(&path, "field is absent"));
            String::new()
        }
        Some(Value::String(text)) => {
            check_filled(report, &path, text);
            text.clone()
        }
        Some(other) => {
            report.push(ValidationError::invalid_type(
                &path,
                format!("expected string, found {}", yaml_type_name(other)),
            ));
            String::new()
        }
    }
}

/// Extracts an optional string field, falling back to `default`.
fn optional_string(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    default: &str,
    report: &mut ValidationReport,
) -> String {
    match lookup_field(section, field) {
        None => default.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            report.push(ValidationError::invalid_type(
                format!("{prefix}.{field}"),
                format!("expected string, found {}", yaml_type_name(other)),
            ));
            default.to_string()
        }
    }
}

/// Extracts an optional boolean field, falling back to `default`.
fn optional_bool(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    default: bool,
    report: &mut ValidationReport,
) -> bool {
    match lookup_field(section, field) {
        None => default,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            report.push(ValidationError::invalid_type(
                format!("{prefix}.{field}"),
                format!("expected boolean, found {}", yaml_type_name(other)),
            ));
            default
        }
    }
}

/// Extracts an optional port field in the range 1-65535.
fn optional_port(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    default: u16,
    report: &mut ValidationReport,
) -> u16 {
    let path = format!("{prefix}.{field}");
    match lookup_field(section, field) {
        None => default,
        Some(Value::Number(num)) => match num.as_u64().and_then(|raw| u16::try_from(raw).ok()) {
            Some(port) if port >= 1 => port,
            _ => {
                report.push(ValidationError::invalid_type(
                    &path,
                    format!("expected integer in range 1-65535, found {num}"),
                ));
                default
            }
        },
        Some(other) => {
            report.push(ValidationError::invalid_type(
                &path,
                format!("expected integer, found {}", yaml_type_name(other)),
            ));
            default
        }
    }
}

/// Extracts an optional integer field constrained to `min..=max`.
fn optional_u32_in_range(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    default: u32,
    min: u32,
    max: u32,
    report: &mut ValidationReport,
) -> u32 {
    let path = format!("{prefix}.{field}");
    match lookup_field(section, field) {
        None => default,
        Some(Value::Number(num)) => match num.as_u64().and_then(|raw| u32::try_from(raw).ok()) {
            Some(value) if value >= min && value <= max => value,
            _ => {
                report.push(ValidationError::invalid_type(
                    &path,
                    format!("expected integer in range {min}-{max}, found {num}"),
                ));
                default
            }
        },
        Some(other) => {
            report.push(ValidationError::invalid_type(
                &path,
                format!("expected integer, found {}", yaml_type_name(other)),
            ));
            default
        }
    }
}

/// Extracts a required integer field of at least `min`.
fn required_u32_min(
    section: Option<&Value>,
    prefix: &str,
    field: &str,
    min: u32,
    report: &mut ValidationReport,
) -> u32 {
    let path = format!("{prefix}.{field}");
    match lookup_field(section, field) {
        None => {
            report.push(ValidationError::missing(&path, "field is absent"));
            min
        }
        Some(Value::Number(num)) => match num.as_u64().and_then(|raw| u32::try_from(raw).ok()) {
            Some(value) if value >= min => value,
            _ => {
                report.push(ValidationError::invalid_type(
                    &path,
                    format!("expected integer of at least {min}, found {num}"),
                ));
                min
            }
        },
        Some(other) => {
            report.push(ValidationError::invalid_type(
                &path,
                format!("expected integer, found {}", yaml_type_name(other)),
            ));
            min
        }
    }
}

/// Extracts the optional `ip_allocation_mode` field.
fn optional_allocation_mode(
    section: Option<&Value>,
    prefix: &str,
    report: &mut ValidationReport,
) -> IpAllocationMode {
    let path = format!("{prefix}.ip_allocation_mode");
    match lookup_field(section, "ip_allocation_mode") {
        None => default_ip_allocation_mode(),
        Some(Value::String(text)) => IpAllocationMode::parse(text).unwrap_or_else(|| {
            report.push(ValidationError::invalid_enum(&path, text, &IP_ALLOCATION_MODES));
            default_ip_allocation_mode()
        }),
        Some(other) => {
            report.push(ValidationError::invalid_type(
                &path,
                format!("expected string, found {}", yaml_type_name(other)),
            ));
            default_ip_allocation_mode()
        }
    }
}

/// Extracts the top-level `vcs` sequence, preserving document order.
fn vcs_from_document(
    doc: &Value,
    policy: &ValidationPolicy,
    report: &mut ValidationReport,
) -> Vec<VcsEntry> {
    match doc.get("vcs") {
        None => {
            check_sequence_len(report, "vcs", 0, policy.empty_vcs);
            Vec::new()
        }
        Some(value) if value.is_null() => {
            check_sequence_len(report, "vcs", 0, policy.empty_vcs);
            Vec::new()
        }
        Some(Value::Sequence(items)) => {
            check_sequence_len(report, "vcs", items.len(), policy.empty_vcs);
            let mut entries = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let prefix = format!("vcs[{index}]");
                if matches!(item, Value::Mapping(_)) {
                    entries.push(VcsEntry::from_section(Some(item), &prefix, report));
                } else {
                    report.push(ValidationError::invalid_type(
                        &prefix,
                        format!("expected mapping, found {}", yaml_type_name(item)),
                    ));
                }
            }
            entries
        }
        Some(other) => {
            report.push(ValidationError::invalid_type(
                "vcs",
                format!("expected sequence, found {}", yaml_type_name(other)),
            ));
            Vec::new()
        }
    }
}

/// Extracts the `broker.templates` sequence, preserving document order.
fn templates_from_section(
    section: Option<&Value>,
    policy: &ValidationPolicy,
    report: &mut ValidationReport,
) -> Vec<TemplateConfig> {
    match lookup_field(section, "templates") {
        None => {
            check_sequence_len(report, "broker.templates", 0, policy.empty_templates);
            Vec::new()
        }
        Some(Value::Sequence(items)) => {
            check_sequence_len(report, "broker.templates", items.len(), policy.empty_templates);
            let mut templates = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let prefix = format!("broker.templates[{index}]");
                if matches!(item, Value::Mapping(_)) {
                    templates.push(TemplateConfig::from_section(Some(item), &prefix, report));
                } else {
                    report.push(ValidationError::invalid_type(
                        &prefix,
                        format!("expected mapping, found {}", yaml_type_name(item)),
                    ));
                }
            }
            templates
        }
        Some(other) => {
            report.push(ValidationError::invalid_type(
                "broker.templates",
                format!("expected sequence, found {}", yaml_type_name(other)),
            ));
            Vec::new()
        }
    }
}

// ============================================================================
// SECTION: Field Rules
// ============================================================================

/// Records a failure when a required string is empty or still the placeholder.
fn check_filled(report: &mut ValidationReport, field: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        report.push(ValidationError::missing(field, "value must be non-empty"));
    } else if trimmed == PLACEHOLDER {
        report.push(ValidationError::missing(field, "placeholder value must be replaced"));
    }
}

/// Records a failure when a port is outside 1-65535.
fn check_port(report: &mut ValidationReport, field: &str, value: u16) {
    if value == 0 {
        report.push(ValidationError::invalid_type(
            field,
            "expected integer in range 1-65535, found 0",
        ));
    }
}

/// Records a failure when a value is outside `min..=max`.
fn check_range_u32(report: &mut ValidationReport, field: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        report.push(ValidationError::invalid_type(
            field,
            format!("expected integer in range {min}-{max}, found {value}"),
        ));
    }
}

/// Records a failure when a value is below `min`.
fn check_min_u32(report: &mut ValidationReport, field: &str, value: u32, min: u32) {
    if value < min {
        report.push(ValidationError::invalid_type(
            field,
            format!("expected integer of at least {min}, found {value}"),
        ));
    }
}

/// Records a failure when a checksum is not 64 hex digits.
///
/// Empty and placeholder values are skipped; [`check_filled`] owns those.
fn check_sha256(report: &mut ValidationReport, field: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return;
    }
    if trimmed.len() != SHA256_HEX_LENGTH || !trimmed.chars().all(|ch| ch.is_ascii_hexdigit()) {
        report.push(ValidationError::invalid_type(field, "expected 64 hexadecimal characters"));
    }
}

/// Records a failure when a source OVA location does not parse as a URL.
///
/// Empty and placeholder values are skipped; [`check_filled`] owns those.
fn check_source_url(report: &mut ValidationReport, field: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return;
    }
    if let Err(err) = Url::parse(trimmed) {
        report.push(ValidationError::invalid_type(field, format!("value is not a valid URL: {err}")));
    }
}

/// Records a failure when an empty boundary sequence is rejected by policy.
fn check_sequence_len(
    report: &mut ValidationReport,
    field: &str,
    len: usize,
    policy: SequencePolicy,
) {
    if len == 0 && !policy.admits_empty() {
        report.push(ValidationError::missing(field, "sequence must contain at least one entry"));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Io("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Io("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Io("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Names a YAML value's type for error messages.
fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default for `test.teardown_installation`.
pub(crate) const fn default_teardown_installation() -> bool {
    true
}

/// Default for `test.teardown_clusters`.
pub(crate) const fn default_teardown_clusters() -> bool {
    true
}

/// Default for `test.test_all_templates`.
pub(crate) const fn default_test_all_templates() -> bool {
    false
}

/// Default AMQP port.
pub(crate) const fn default_amqp_port() -> u16 {
    5672
}

/// Default AMQP queue prefix.
pub(crate) const fn default_amqp_prefix() -> &'static str {
    "vcd"
}

/// Default AMQP exchange name.
pub(crate) const fn default_amqp_exchange() -> &'static str {
    "cse-ext"
}

/// Default AMQP routing key.
pub(crate) const fn default_amqp_routing_key() -> &'static str {
    "cse"
}

/// Default for `amqp.ssl`.
pub(crate) const fn default_amqp_ssl() -> bool {
    false
}

/// Default for `amqp.ssl_accept_all`.
pub(crate) const fn default_amqp_ssl_accept_all() -> bool {
    false
}

/// Default AMQP virtual host.
pub(crate) const fn default_amqp_vhost() -> &'static str {
    "/"
}

/// Default vCD API port.
pub(crate) const fn default_vcd_port() -> u16 {
    443
}

/// Default for `vcd.verify`.
pub(crate) const fn default_vcd_verify() -> bool {
    false
}

/// Default for `vcd.log`.
pub(crate) const fn default_vcd_log() -> bool {
    false
}

/// Default for `vcs[].verify`.
pub(crate) const fn default_vcs_verify() -> bool {
    false
}

/// Default listener count.
pub(crate) const fn default_listeners() -> u32 {
    5
}

/// Default for `service.enforce_authorization`.
pub(crate) const fn default_enforce_authorization() -> bool {
    false
}

/// Default broker catalog name.
pub(crate) const fn default_broker_catalog() -> &'static str {
    "cse"
}

/// Default IP allocation mode.
pub(crate) const fn default_ip_allocation_mode() -> IpAllocationMode {
    IpAllocationMode::Pool
}

/// Default storage profile selector.
pub(crate) const fn default_storage_profile() -> &'static str {
    "*"
}

/// Default for `broker.templates[].cleanup`.
pub(crate) const fn default_template_cleanup() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
