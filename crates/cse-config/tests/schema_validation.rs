//! JSON Schema validation tests for cse-config.
// crates/cse-config/tests/schema_validation.rs
// =============================================================================
// Module: Schema Validation Tests
// Description: Validate documents against the generated JSON schema.
// Purpose: Keep the schema aligned with loader acceptance and rejection.
// =============================================================================

use cse_config::config_schema;
use jsonschema::Validator;
use serde_json::Value;

mod common;

type TestResult = Result<(), String>;

fn compiled_schema() -> Result<Validator, String> {
    jsonschema::validator_for(&config_schema())
        .map_err(|err| format!("schema failed to compile: {err}"))
}

fn yaml_to_json(text: &str) -> Result<Value, String> {
    serde_yaml::from_str(text).map_err(|err| format!("yaml did not parse: {err}"))
}

fn schema_errors(validator: &Validator, instance: &Value) -> Vec<String> {
    validator.iter_errors(instance).map(|error| error.to_string()).collect()
}

#[test]
fn schema_compiles() -> TestResult {
    compiled_schema().map(|_| ())
}

#[test]
fn filled_document_satisfies_schema() -> TestResult {
    let validator = compiled_schema()?;
    let instance = yaml_to_json(&common::filled_yaml())?;
    let errors = schema_errors(&validator, &instance);
    if !errors.is_empty() {
        return Err(format!("filled document should satisfy the schema: {errors:?}"));
    }
    Ok(())
}

#[test]
fn placeholder_values_violate_schema() -> TestResult {
    let validator = compiled_schema()?;
    let text = common::filled_yaml().replacen("host: amqp.example.com", "host: CHANGE_ME", 1);
    let instance = yaml_to_json(&text)?;
    if schema_errors(&validator, &instance).is_empty() {
        return Err("placeholder host should violate the schema".to_string());
    }
    Ok(())
}

#[test]
fn quoted_port_violates_schema() -> TestResult {
    let validator = compiled_schema()?;
    let text = common::filled_yaml().replacen("port: 5672", "port: '5672'", 1);
    let instance = yaml_to_json(&text)?;
    if schema_errors(&validator, &instance).is_empty() {
        return Err("string-typed port should violate the schema".to_string());
    }
    Ok(())
}

#[test]
fn empty_boundary_sequences_violate_schema() -> TestResult {
    let validator = compiled_schema()?;
    let text = common::filled_yaml()
        .replacen(
            "vcs:\n- name: vc1\n  username: cse_user@vsphere.local\n  password: vc1-secret\n  verify: true\n- name: vc2\n  username: backup@vsphere.local\n  password: vc2-secret\n",
            "vcs: []\n",
            1,
        );
    let instance = yaml_to_json(&text)?;
    let errors = schema_errors(&validator, &instance);
    if errors.is_empty() {
        return Err("empty vcs sequence should violate the schema".to_string());
    }
    Ok(())
}

#[test]
fn missing_required_section_violates_schema() -> TestResult {
    let validator = compiled_schema()?;
    let mut instance = yaml_to_json(&common::filled_yaml())?;
    if let Value::Object(map) = &mut instance {
        map.remove("broker");
    }
    if schema_errors(&validator, &instance).is_empty() {
        return Err("missing broker section should violate the schema".to_string());
    }
    Ok(())
}

#[test]
fn unknown_keys_are_allowed() -> TestResult {
    let validator = compiled_schema()?;
    let text = format!("{}operator_notes: keep until migration\n", common::filled_yaml());
    let instance = yaml_to_json(&text)?;
    let errors = schema_errors(&validator, &instance);
    if !errors.is_empty() {
        return Err(format!("unknown top-level keys should be allowed: {errors:?}"));
    }
    Ok(())
}

#[test]
fn out_of_range_listeners_violate_schema() -> TestResult {
    let validator = compiled_schema()?;
    let text = common::filled_yaml().replacen("listeners: 10", "listeners: 129", 1);
    let instance = yaml_to_json(&text)?;
    if schema_errors(&validator, &instance).is_empty() {
        return Err("listeners above range should violate the schema".to_string());
    }
    Ok(())
}
