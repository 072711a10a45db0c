// crates/cse-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: cse-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the CSE CLI i18n catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](cse_cli::t) macro formats placeholders correctly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use cse_cli::i18n::Locale;
use cse_cli::i18n::MessageArg;
use cse_cli::i18n::SUPPORTED_LOCALES;
use cse_cli::i18n::translate;
use cse_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/config.yaml");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/config.yaml");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("path", "/tmp/config.yaml")];
    let result = translate("sample.written", args);
    assert_eq!(result, "Sample configuration written to /tmp/config.yaml");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    let result = translate("missing.key", Vec::new());
    assert_eq!(result, "missing.key");
}

/// Confirms the t! macro formats named arguments.
#[test]
fn t_macro_formats_message() {
    let rendered = t!("main.version", version = "0.1.0");
    assert!(rendered.contains("cse"));
    assert!(rendered.contains("0.1.0"));
}

/// Confirms locale parsing tolerates case and region tags.
#[test]
fn locale_parse_tolerates_region_tags() {
    assert_eq!(Locale::parse("ca-ES"), Some(Locale::Ca));
    assert_eq!(Locale::parse("EN_us"), Some(Locale::En));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("fr"), None);
}

/// Confirms the supported locale list leads with the English fallback.
#[test]
fn supported_locales_lead_with_english() {
    assert_eq!(SUPPORTED_LOCALES.first(), Some(&Locale::En));
    assert_eq!(Locale::En.as_str(), "en");
    assert_eq!(Locale::Ca.as_str(), "ca");
}
