// crates/cse-config/src/lib.rs
// ============================================================================
// Module: CSE Config Library
// Description: Canonical config model, validation, and artifact generation.
// Purpose: Single source of truth for config.yaml semantics.
// Dependencies: serde, serde_yaml, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! `cse-config` defines the canonical configuration model for the Container
//! Service Extension server. It provides strict validation with accumulated
//! error reporting and deterministic generators for the config schema, the
//! operator sample, and reference docs.
//!
//! The document itself is inert data: loading is a pure parse-and-validate
//! step with no side effects, performed once before the server connects to
//! anything.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod docs;
pub mod examples;
pub mod policy;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use docs::config_docs_markdown;
pub use docs::verify_config_docs;
pub use docs::write_config_docs;
pub use examples::config_yaml_sample;
pub use policy::*;
pub use schema::config_schema;
