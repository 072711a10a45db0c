// crates/cse-config/src/docs.rs
// ============================================================================
// Module: Config Docs Generator
// Description: Markdown generator for config.yaml documentation.
// Purpose: Keep config docs in sync with schema and validation.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Generates `Docs/configuration/config.yaml.md` from the canonical
//! configuration schema. The output is deterministic: every field table is
//! rendered from the same schema the validator consumes, and generation fails
//! when a schema field is missing from the section registry or vice versa.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::schema::config_schema;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default output path for generated configuration docs.
const DOCS_PATH: &str = "Docs/configuration/config.yaml.md";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when generating or verifying config docs.
#[derive(Debug, Error)]
pub enum DocsError {
    /// IO failure while writing docs.
    #[error("docs io error: {0}")]
    Io(String),
    /// Schema traversal or rendering error.
    #[error("docs schema error: {0}")]
    Schema(String),
    /// Generated docs do not match the committed file.
    #[error("docs drift: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Generates the configuration markdown documentation.
///
/// # Errors
///
/// Returns [`DocsError`] when schema traversal fails.
pub fn config_docs_markdown() -> Result<String, DocsError> {
    let schema = config_schema();
    let mut out = String::new();

    out.push_str("<!--\n");
    out.push_str("Docs/configuration/config.yaml.md\n");
    out.push_str("============================================================================\n");
    out.push_str("Document: CSE Server Configuration\n");
    out.push_str("Description: Reference for config.yaml configuration fields.\n");
    out.push_str("Purpose: Document broker, vCD, vCenter, and service settings.\n");
    out.push_str("Generated: This file is auto-generated; do not edit manually.\n");
    out.push_str("============================================================================\n");
    out.push_str("-->\n\n");

    out.push_str("# config.yaml Configuration\n\n");
    out.push_str("## Overview\n\n");
    out.push_str("`config.yaml` configures the CSE server: the AMQP exchange it consumes\n");
    out.push_str("requests from, the vCloud Director and vCenter endpoints it talks to, and\n");
    out.push_str("the template catalog it provisions from. The file is validated before the\n");
    out.push_str("server starts; every field failure is reported in one pass.\n\n");

    out.push_str("## Top-Level Sections\n\n");

    let sections = build_sections();
    for section in sections {
        out.push_str("### ");
        out.push_str(section.heading);
        out.push_str("\n\n");
        if !section.description.is_empty() {
            out.push_str(section.description);
            out.push_str("\n\n");
        }
        let table = render_table(&schema, &section).map_err(DocsError::Schema)?;
        out.push_str(&table);
        if let Some(extra) = section.extra {
            out.push('\n');
            out.push_str(extra);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("## Placeholders\n\n");
    out.push_str("Generated sample files ship `CHANGE_ME` in every credential and endpoint\n");
    out.push_str("field the operator must fill in. A placeholder that survives into a real\n");
    out.push_str("config is reported as a missing required field, never silently accepted.\n");

    Ok(out)
}

/// Writes the generated docs to the standard location.
///
/// # Errors
///
/// Returns [`DocsError`] when file output fails.
pub fn write_config_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = config_docs_markdown()?;
    fs::write(path, content.as_bytes()).map_err(|err| DocsError::Io(err.to_string()))
}

/// Verifies the on-disk docs match the generated output.
///
/// # Errors
///
/// Returns [`DocsError`] when the docs drift.
pub fn verify_config_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = config_docs_markdown()?;
    let existing = fs::read_to_string(path).map_err(|err| DocsError::Io(err.to_string()))?;
    if existing != content {
        return Err(DocsError::Drift(format!("docs mismatch: {}", path.display())));
    }
    Ok(())
}

// ============================================================================
// SECTION: Section Specs
// ============================================================================

/// Specification for one rendered documentation section.
#[derive(Clone)]
struct SectionSpec {
    /// Section heading, including the YAML key path.
    heading: &'static str,
    /// Section description displayed beneath the heading.
    description: &'static str,
    /// Schema traversal path used to resolve the section.
    path: &'static [SchemaPath],
    /// Ordered field list rendered in the docs table.
    fields: &'static [&'static str],
    /// Whether to include a "Required" column.
    include_required: bool,
    /// Optional additional text appended after the table.
    extra: Option<&'static str>,
}

/// Path segment for resolving nested schema properties.
#[derive(Clone, Copy)]
enum SchemaPath {
    /// Descend into an object property.
    Property(&'static str),
    /// Descend into an array items schema.
    Items,
}

// ============================================================================
// SECTION: Section Registry
// ============================================================================

/// Builds the ordered list of configuration sections to render.
#[allow(
    clippy::too_many_lines,
    reason = "The section list reads best as one inline literal."
)]
fn build_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            heading: "`test`",
            description: "Flags consumed by the external test harness.",
            path: &[SchemaPath::Property("test")],
            fields: &["teardown_installation", "teardown_clusters", "test_all_templates"],
            include_required: false,
            extra: None,
        },
        SectionSpec {
            heading: "`amqp`",
            description: "AMQP endpoint the server consumes requests from.",
            path: &[SchemaPath::Property("amqp")],
            fields: &[
                "host",
                "port",
                "prefix",
                "username",
                "password",
                "exchange",
                "routing_key",
                "ssl",
                "ssl_accept_all",
                "vhost",
            ],
            include_required: true,
            extra: Some("`ssl_accept_all` only applies when `ssl` is enabled."),
        },
        SectionSpec {
            heading: "`vcd`",
            description: "vCloud Director API endpoint and system administrator credentials.",
            path: &[SchemaPath::Property("vcd")],
            fields: &["host", "port", "username", "password", "api_version", "verify", "log"],
            include_required: true,
            extra: Some(
                "`api_version` must be quoted in YAML so it loads as a string; an unquoted\n\
                 `29.0` parses as a float and is rejected.",
            ),
        },
        SectionSpec {
            heading: "`vcs[]`",
            description: "Backing vCenter cells, one entry per cell registered in vCD.",
            path: &[SchemaPath::Property("vcs"), SchemaPath::Items],
            fields: &["name", "username", "password", "verify"],
            include_required: true,
            extra: Some(
                "Example entry:\n\n```yaml\nvcs:\n- name: vc1\n  username: cse_user@vsphere.local\n  password: my_secret_password\n  verify: true\n```\n\nAn empty `vcs` sequence is rejected by default; pass `--allow-empty-vcs` to\nadmit a deployment without registered cells.",
            ),
        },
        SectionSpec {
            heading: "`service`",
            description: "Server runtime tuning.",
            path: &[SchemaPath::Property("service")],
            fields: &["listeners", "enforce_authorization"],
            include_required: false,
            extra: None,
        },
        SectionSpec {
            heading: "`broker`",
            description: "Template catalog and provisioning parameters.",
            path: &[SchemaPath::Property("broker")],
            fields: &[
                "org",
                "vdc",
                "catalog",
                "network",
                "ip_allocation_mode",
                "storage_profile",
                "default_template",
                "templates",
            ],
            include_required: true,
            extra: Some(
                "An empty `templates` sequence is rejected by default; pass\n`--allow-empty-templates` to admit a catalog-less deployment.",
            ),
        },
        SectionSpec {
            heading: "`broker.templates[]`",
            description: "Buildable VM templates, one entry per catalog item.",
            path: &[
                SchemaPath::Property("broker"),
                SchemaPath::Property("templates"),
                SchemaPath::Items,
            ],
            fields: &[
                "name",
                "catalog_item",
                "source_ova",
                "source_ova_name",
                "sha256_ova",
                "temp_vapp",
                "cleanup",
                "cpu",
                "mem",
                "admin_password",
                "description",
            ],
            include_required: true,
            extra: Some(
                "`sha256_ova` is the hex digest of the downloaded OVA and must be exactly\n64 hexadecimal characters. `source_ova` must parse as a URL.",
            ),
        },
    ]
}

// ============================================================================
// SECTION: Rendering Helpers
// ============================================================================

/// Renders the markdown table for a configuration section.
fn render_table(schema: &Value, section: &SectionSpec) -> Result<String, String> {
    let section_schema = schema_at(schema, section.path)?;
    let props = section_schema
        .get("properties")
        .and_then(|value| value.as_object())
        .ok_or_else(|| "schema properties missing".to_string())?;

    let mut seen = BTreeSet::new();
    for field in section.fields {
        if !props.contains_key(*field) {
            return Err(format!("missing field in schema: {field}"));
        }
        seen.insert(*field);
    }
    for key in props.keys() {
        if !seen.contains(key.as_str()) {
            return Err(format!("field not documented: {key}"));
        }
    }

    let required = section_schema
        .get("required")
        .and_then(|value| value.as_array())
        .map(|arr| arr.iter().filter_map(|val| val.as_str()).collect::<Vec<&str>>())
        .unwrap_or_default();

    let mut table = String::new();
    if section.include_required {
        table.push_str("| Field | Type | Required | Default | Notes |\n");
        table.push_str("| --- | --- | --- | --- | --- |\n");
    } else {
        table.push_str("| Field | Type | Default | Notes |\n");
        table.push_str("| --- | --- | --- | --- |\n");
    }

    for field in section.fields {
        let prop_schema =
            props.get(*field).ok_or_else(|| format!("missing field schema: {field}"))?;
        let field_type = format_schema_type(prop_schema);
        let default_value = prop_schema
            .get("default")
            .map_or_else(|| "n/a".to_string(), format_default_value);
        let notes = prop_schema.get("description").and_then(|value| value.as_str()).unwrap_or("");

        if section.include_required {
            let required_value = if required.contains(field) { "yes" } else { "no" };
            let _ = writeln!(
                &mut table,
                "| `{field}` | {field_type} | {required_value} | {default_value} | {notes} |"
            );
        } else {
            let _ =
                writeln!(&mut table, "| `{field}` | {field_type} | {default_value} | {notes} |");
        }
    }

    Ok(table)
}

/// Resolves a schema node by walking a path of properties/items.
fn schema_at<'a>(schema: &'a Value, path: &[SchemaPath]) -> Result<&'a Value, String> {
    let mut current = schema;
    for segment in path {
        current = match segment {
            SchemaPath::Property(name) => {
                let props = current
                    .get("properties")
                    .and_then(|value| value.as_object())
                    .ok_or_else(|| format!("properties missing while seeking {name}"))?;
                props.get(*name).ok_or_else(|| format!("property not found: {name}"))?
            }
            SchemaPath::Items => {
                current.get("items").ok_or_else(|| "array items missing".to_string())?
            }
        };
    }
    Ok(current)
}

/// Formats a schema type for markdown tables.
fn format_schema_type(schema: &Value) -> String {
    let raw = format_schema_type_raw(schema);
    escape_table_cell(&raw)
}

/// Formats a schema type without markdown escaping.
fn format_schema_type_raw(schema: &Value) -> String {
    if let Some(enum_vals) = schema.get("enum").and_then(|val| val.as_array()) {
        let items = enum_vals.iter().map(format_enum_value).collect::<Vec<String>>();
        return items.join(" | ");
    }
    if let Some(type_str) = schema.get("type").and_then(|val| val.as_str()) {
        return match type_str {
            "boolean" => "bool".to_string(),
            "array" => "sequence".to_string(),
            "object" => "mapping".to_string(),
            other => other.to_string(),
        };
    }
    "unknown".to_string()
}

/// Escapes pipe characters for markdown table cells.
fn escape_table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Formats enum values as YAML-compatible strings.
fn format_enum_value(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), ToString::to_string)
}

/// Formats schema defaults for display in docs.
fn format_default_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(val) => val.to_string(),
        Value::Number(val) => val.to_string(),
        Value::String(val) => {
            if val.is_empty() {
                "\"\"".to_string()
            } else {
                val.clone()
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                "[]".to_string()
            } else {
                let items = arr.iter().map(format_enum_value).collect::<Vec<String>>();
                format!("[{}]", items.join(", "))
            }
        }
        Value::Object(_) => "{...}".to_string(),
    }
}
