// crates/cse-cli/src/lib.rs
// ============================================================================
// Module: CSE CLI Library
// Description: Shared CLI helpers exposed to the binary and tests.
// Purpose: Host the i18n catalog behind the `t!` macro.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Library surface for the CSE CLI. The binary routes every user-facing
//! string through [`i18n`] so messages stay consistent and localizable.

pub mod i18n;
