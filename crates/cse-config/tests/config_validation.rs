//! Loader and validation tests for cse-config.
// crates/cse-config/tests/config_validation.rs
// =============================================================================
// Module: Config Loader and Validation Tests
// Description: Validate file loading, error accumulation, and policy handling.
// Purpose: Ensure operators see every config failure in a single pass.
// =============================================================================

use std::fs;

use cse_config::ConfigError;
use cse_config::CseConfig;
use cse_config::PLACEHOLDER;
use cse_config::ValidationError;
use cse_config::ValidationPolicy;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CseConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

// ============================================================================
// SECTION: File Loading
// ============================================================================

#[test]
fn load_reads_explicit_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("config.yaml");
    fs::write(&path, common::filled_yaml()).map_err(|err| err.to_string())?;

    let config = CseConfig::load(Some(&path), &ValidationPolicy::default())
        .map_err(|err| err.to_string())?;
    if config.vcs.len() != 2 {
        return Err(format!("expected 2 vcs entries, got {}", config.vcs.len()));
    }
    if config.broker.templates.len() != 2 {
        return Err(format!("expected 2 templates, got {}", config.broker.templates.len()));
    }
    Ok(())
}

#[test]
fn load_missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.yaml");

    match CseConfig::load(Some(&path), &ValidationPolicy::default()) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected io error for a missing file".to_string()),
    }
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("huge.yaml");
    fs::write(&path, vec![b'#'; 1024 * 1024 + 1]).map_err(|err| err.to_string())?;

    match CseConfig::load(Some(&path), &ValidationPolicy::default()) {
        Err(ConfigError::Io(message)) => {
            if message.contains("size limit") {
                Ok(())
            } else {
                Err(format!("unexpected io message: {message}"))
            }
        }
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected oversized file to be rejected".to_string()),
    }
}

#[test]
fn load_rejects_non_utf8_bytes() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("binary.yaml");
    fs::write(&path, [0xFF, 0xFE, 0x00, 0x41]).map_err(|err| err.to_string())?;

    match CseConfig::load(Some(&path), &ValidationPolicy::default()) {
        Err(ConfigError::MalformedDocument(message)) => {
            if message.contains("utf-8") {
                Ok(())
            } else {
                Err(format!("unexpected message: {message}"))
            }
        }
        Err(other) => Err(format!("expected malformed document, got {other}")),
        Ok(_) => Err("expected non-utf8 bytes to be rejected".to_string()),
    }
}

#[test]
fn load_rejects_overlong_path_component() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("a".repeat(300));

    match CseConfig::load(Some(&path), &ValidationPolicy::default()) {
        Err(ConfigError::Io(message)) => {
            if message.contains("component") {
                Ok(())
            } else {
                Err(format!("unexpected io message: {message}"))
            }
        }
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected overlong path component to be rejected".to_string()),
    }
}

#[test]
fn round_trip_through_file_preserves_record() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let first = dir.path().join("config.yaml");
    fs::write(&first, common::filled_yaml()).map_err(|err| err.to_string())?;

    let config = CseConfig::load(Some(&first), &ValidationPolicy::default())
        .map_err(|err| err.to_string())?;
    let emitted = config.to_yaml_string().map_err(|err| err.to_string())?;

    let second = dir.path().join("emitted.yaml");
    fs::write(&second, emitted).map_err(|err| err.to_string())?;
    let reloaded = CseConfig::load(Some(&second), &ValidationPolicy::default())
        .map_err(|err| err.to_string())?;

    if reloaded != config {
        return Err("record changed across a file round trip".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Error Accumulation
// ============================================================================

#[test]
fn placeholder_is_reported_as_missing() -> TestResult {
    let text = common::filled_yaml().replacen("host: vcd.example.com", "host: CHANGE_ME", 1);
    assert_invalid(common::load(&text), "placeholder value must be replaced")
}

#[test]
fn one_failure_per_section_is_accumulated() -> TestResult {
    let text = common::filled_yaml()
        .replacen("host: amqp.example.com", "host: CHANGE_ME", 1)
        .replacen("api_version: '29.0'", "api_version: 29.0", 1)
        .replacen("  password: vc2-secret\n", "", 1)
        .replacen("listeners: 10", "listeners: 0", 1)
        .replacen("ip_allocation_mode: pool", "ip_allocation_mode: static", 1);
    let report = match common::load(&text) {
        Err(ConfigError::Invalid(report)) => report,
        Err(other) => return Err(format!("expected validation report, got {other}")),
        Ok(_) => return Err("expected invalid config".to_string()),
    };

    if report.len() != 5 {
        return Err(format!("expected 5 failures, got {}: {report}", report.len()));
    }
    let fields: Vec<&str> = report.errors().iter().map(ValidationError::field).collect();
    for expected in
        ["amqp.host", "vcd.api_version", "vcs[1].password", "service.listeners", "broker.ip_allocation_mode"]
    {
        if !fields.contains(&expected) {
            return Err(format!("missing failure for {expected}: {report}"));
        }
    }
    Ok(())
}

#[test]
fn all_three_error_categories_surface_together() -> TestResult {
    let text = common::filled_yaml()
        .replacen("  username: administrator\n", "", 1)
        .replacen("ip_allocation_mode: pool", "ip_allocation_mode: static", 1)
        .replacen("cpu: 4", "cpu: many", 1);
    let report = match common::load(&text) {
        Err(ConfigError::Invalid(report)) => report,
        Err(other) => return Err(format!("expected validation report, got {other}")),
        Ok(_) => return Err("expected invalid config".to_string()),
    };

    let mut missing = false;
    let mut bad_enum = false;
    let mut bad_type = false;
    for error in report.errors() {
        match error {
            ValidationError::MissingRequiredField { .. } => missing = true,
            ValidationError::InvalidEnumValue { .. } => bad_enum = true,
            ValidationError::InvalidType { .. } => bad_type = true,
        }
    }
    if !(missing && bad_enum && bad_type) {
        return Err(format!("expected all three error categories: {report}"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Validation Policy
// ============================================================================

#[test]
fn empty_boundary_sequences_follow_policy() -> TestResult {
    let text = "amqp:\n  host: amqp.example.com\n  username: u\n  password: p\nvcd:\n  host: vcd.example.com\n  username: u\n  password: p\n  api_version: '29.0'\nvcs: []\nbroker:\n  org: o\n  vdc: v\n  network: n\n  default_template: t\n  templates: []\n";

    assert_invalid(common::load(text), "sequence must contain at least one entry")?;

    let config = common::load_permissive(text).map_err(|err| err.to_string())?;
    if !config.vcs.is_empty() || !config.broker.templates.is_empty() {
        return Err("permissive load should keep boundary sequences empty".to_string());
    }
    Ok(())
}

#[test]
fn validate_applies_policy_to_constructed_records() -> TestResult {
    let mut config = common::load(&common::filled_yaml()).map_err(|err| err.to_string())?;
    config.vcs.clear();

    if config.validate(&ValidationPolicy::default()).is_ok() {
        return Err("default policy should reject an empty vcs sequence".to_string());
    }
    config
        .validate(&ValidationPolicy::permissive())
        .map_err(|err| format!("permissive policy should accept empty vcs: {err}"))?;
    Ok(())
}

#[test]
fn validate_reuses_loader_field_rules() -> TestResult {
    let mut config = common::load(&common::filled_yaml()).map_err(|err| err.to_string())?;
    config.broker.templates[0].sha256_ova = "deadbeef".to_string();
    config.broker.templates[1].admin_password = PLACEHOLDER.to_string();
    config.vcd.port = 0;

    let error = match config.validate(&ValidationPolicy::default()) {
        Err(error) => error,
        Ok(()) => return Err("expected constructed record to fail validation".to_string()),
    };
    let message = error.to_string();
    for needle in [
        "broker.templates[0].sha256_ova",
        "broker.templates[1].admin_password",
        "vcd.port",
    ] {
        if !message.contains(needle) {
            return Err(format!("error {message} did not contain {needle}"));
        }
    }
    Ok(())
}
