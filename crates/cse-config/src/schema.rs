// crates/cse-config/src/schema.rs
// ============================================================================
// Module: Config Schema
// Description: JSON schema builder for config.yaml.
// Purpose: Provide the canonical validation schema for config artifacts.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! This module defines the JSON Schema for CSE configuration. The schema is
//! generated from the canonical config model and is used by tooling, docs,
//! and validation pipelines.
//!
//! The schema encodes the loader's default validation policy: boundary
//! sequences carry `minItems: 1`, and required strings exclude the
//! `CHANGE_ME` placeholder. Unknown keys are permitted, matching the loader.

use serde_json::Value;
use serde_json::json;

use crate::config::IP_ALLOCATION_MODES;
use crate::config::MAX_LISTENERS;
use crate::config::MIN_LISTENERS;
use crate::config::MIN_TEMPLATE_CPU;
use crate::config::MIN_TEMPLATE_MEM_MB;
use crate::config::PLACEHOLDER;
use crate::config::SHA256_HEX_LENGTH;
use crate::config::default_amqp_exchange;
use crate::config::default_amqp_port;
use crate::config::default_amqp_prefix;
use crate::config::default_amqp_routing_key;
use crate::config::default_amqp_ssl;
use crate::config::default_amqp_ssl_accept_all;
use crate::config::default_amqp_vhost;
use crate::config::default_broker_catalog;
use crate::config::default_enforce_authorization;
use crate::config::default_ip_allocation_mode;
use crate::config::default_listeners;
use crate::config::default_storage_profile;
use crate::config::default_teardown_clusters;
use crate::config::default_teardown_installation;
use crate::config::default_template_cleanup;
use crate::config::default_test_all_templates;
use crate::config::default_vcd_log;
use crate::config::default_vcd_port;
use crate::config::default_vcd_verify;
use crate::config::default_vcs_verify;

/// Returns the JSON schema for `config.yaml`.
#[must_use]
pub fn config_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "cse://schemas/config.schema.json",
        "title": "CSE Server Configuration",
        "description": "Configuration for the Container Service Extension server.",
        "type": "object",
        "properties": {
            "test": test_config_schema(),
            "amqp": amqp_config_schema(),
            "vcd": vcd_config_schema(),
            "vcs": {
                "type": "array",
                "items": vcs_entry_schema(),
                "minItems": 1,
                "description": "Backing vCenter cells, in document order."
            },
            "service": service_config_schema(),
            "broker": broker_config_schema()
        },
        "required": ["amqp", "vcd", "vcs", "broker"],
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: Test Configuration
// ============================================================================

/// Schema for the `test` section.
fn test_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "teardown_installation": schema_for_flag(
                "Tear down installation entities after the run.",
                default_teardown_installation()
            ),
            "teardown_clusters": schema_for_flag(
                "Tear down clusters created during the run.",
                default_teardown_clusters()
            ),
            "test_all_templates": schema_for_flag(
                "Exercise every template instead of the default one.",
                default_test_all_templates()
            )
        },
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: AMQP Configuration
// ============================================================================

/// Schema for the `amqp` section.
fn amqp_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "host": schema_for_required_string("AMQP broker hostname."),
            "port": schema_for_port("AMQP broker port.", default_amqp_port()),
            "prefix": schema_for_string(
                "Prefix applied to queue names owned by this deployment.",
                default_amqp_prefix()
            ),
            "username": schema_for_required_string("AMQP login user."),
            "password": schema_for_required_string("AMQP login password."),
            "exchange": schema_for_string(
                "Exchange the server binds to.",
                default_amqp_exchange()
            ),
            "routing_key": schema_for_string(
                "Routing key for request messages.",
                default_amqp_routing_key()
            ),
            "ssl": schema_for_flag("Connect over TLS.", default_amqp_ssl()),
            "ssl_accept_all": schema_for_flag(
                "Accept any broker certificate when TLS is enabled.",
                default_amqp_ssl_accept_all()
            ),
            "vhost": schema_for_string("AMQP virtual host.", default_amqp_vhost())
        },
        "required": ["host", "username", "password"],
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: vCD Configuration
// ============================================================================

/// Schema for the `vcd` section.
fn vcd_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "host": schema_for_required_string("vCloud Director hostname."),
            "port": schema_for_port("vCloud Director API port.", default_vcd_port()),
            "username": schema_for_required_string("System administrator user."),
            "password": schema_for_required_string("System administrator password."),
            "api_version": schema_for_required_string(
                "Pinned vCD API version string, quoted (e.g. \"29.0\")."
            ),
            "verify": schema_for_flag(
                "Verify the vCD TLS certificate.",
                default_vcd_verify()
            ),
            "log": schema_for_flag(
                "Log API request and response bodies to the server log.",
                default_vcd_log()
            )
        },
        "required": ["host", "username", "password", "api_version"],
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: vCenter Entries
// ============================================================================

/// Schema for one `vcs` entry.
fn vcs_entry_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": schema_for_required_string("Cell name as registered in vCD."),
            "username": schema_for_required_string("vCenter login user."),
            "password": schema_for_required_string("vCenter login password."),
            "verify": schema_for_flag(
                "Verify the vCenter TLS certificate.",
                default_vcs_verify()
            )
        },
        "required": ["name", "username", "password"],
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: Service Configuration
// ============================================================================

/// Schema for the `service` section.
fn service_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "listeners": {
                "type": "integer",
                "minimum": MIN_LISTENERS,
                "maximum": MAX_LISTENERS,
                "default": default_listeners(),
                "description": "Number of concurrent request listeners."
            },
            "enforce_authorization": schema_for_flag(
                "Require vCD rights grants before serving cluster operations.",
                default_enforce_authorization()
            )
        },
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: Broker Configuration
// ============================================================================

/// Schema for the `broker` section.
fn broker_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "org": schema_for_required_string(
                "Organization owning the catalog and build vApps."
            ),
            "vdc": schema_for_required_string(
                "Virtual data center used for template builds."
            ),
            "catalog": schema_for_string(
                "Catalog holding published template items.",
                default_broker_catalog()
            ),
            "network": schema_for_required_string(
                "Org VDC network used during template builds."
            ),
            "ip_allocation_mode": {
                "type": "string",
                "enum": IP_ALLOCATION_MODES,
                "default": default_ip_allocation_mode(),
                "description": "IP allocation mode for build networks."
            },
            "storage_profile": schema_for_string(
                "Storage profile for build vApps (`*` selects any).",
                default_storage_profile()
            ),
            "default_template": schema_for_required_string(
                "Name of the template used when a request names none."
            ),
            "templates": {
                "type": "array",
                "items": template_config_schema(),
                "minItems": 1,
                "description": "Buildable VM templates, in document order."
            }
        },
        "required": ["org", "vdc", "network", "default_template", "templates"],
        "additionalProperties": true
    })
}

/// Schema for one `broker.templates` entry.
fn template_config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": schema_for_required_string("Template name requests refer to."),
            "catalog_item": schema_for_required_string(
                "Catalog item the build publishes."
            ),
            "source_ova": {
                "type": "string",
                "minLength": 1,
                "format": "uri",
                "not": { "const": PLACEHOLDER },
                "description": "Download URL of the source OVA."
            },
            "source_ova_name": schema_for_required_string(
                "Filename the source OVA is stored under."
            ),
            "sha256_ova": {
                "type": "string",
                "pattern": format!("^[0-9a-fA-F]{{{SHA256_HEX_LENGTH}}}$"),
                "description": "Expected SHA-256 digest of the source OVA, hex encoded."
            },
            "temp_vapp": schema_for_required_string(
                "Name of the temporary vApp used during the build."
            ),
            "cleanup": schema_for_flag(
                "Delete the temporary vApp after capture.",
                default_template_cleanup()
            ),
            "cpu": {
                "type": "integer",
                "minimum": MIN_TEMPLATE_CPU,
                "description": "Virtual CPU count for instantiated nodes."
            },
            "mem": {
                "type": "integer",
                "minimum": MIN_TEMPLATE_MEM_MB,
                "description": "Memory in megabytes for instantiated nodes."
            },
            "admin_password": schema_for_required_string(
                "Guest OS administrator password set during the build."
            ),
            "description": schema_for_string(
                "Human-readable description published with the catalog item.",
                ""
            )
        },
        "required": [
            "name",
            "catalog_item",
            "source_ova",
            "source_ova_name",
            "sha256_ova",
            "temp_vapp",
            "cpu",
            "mem",
            "admin_password"
        ],
        "additionalProperties": true
    })
}

// ============================================================================
// SECTION: Schema Helpers
// ============================================================================

/// Schema for a required string that must be filled in by the operator.
fn schema_for_required_string(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "not": { "const": PLACEHOLDER },
        "description": description
    })
}

/// Schema for an optional string with a default.
fn schema_for_string(description: &str, default: &str) -> Value {
    json!({
        "type": "string",
        "default": default,
        "description": description
    })
}

/// Schema for an optional boolean flag with a default.
fn schema_for_flag(description: &str, default: bool) -> Value {
    json!({
        "type": "boolean",
        "default": default,
        "description": description
    })
}

/// Schema for an optional TCP port with a default.
fn schema_for_port(description: &str, default: u16) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": 65535,
        "default": default,
        "description": description
    })
}
