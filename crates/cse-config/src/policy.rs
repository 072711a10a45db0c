// crates/cse-config/src/policy.rs
// ============================================================================
// Module: Validation Policy
// Description: Operator-selectable policy for boundary sequence handling.
// Purpose: Make empty `vcs` / `broker.templates` handling an explicit choice.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The source document format gives no example of an empty `vcs` or
//! `broker.templates` sequence, so the loader does not guess: each boundary
//! sequence carries an explicit [`SequencePolicy`], defaulting to `reject`.
//! A rejected empty sequence is reported as a missing required field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Policy Model
// ============================================================================

/// Handling for a boundary sequence with zero entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Fail validation when the sequence is empty.
    #[default]
    Reject,
    /// Admit an empty sequence.
    Accept,
}

impl SequencePolicy {
    /// Returns true when an empty sequence passes under this policy.
    #[must_use]
    pub const fn admits_empty(self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Validation policy applied while loading a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationPolicy {
    /// Handling for an empty top-level `vcs` sequence.
    pub empty_vcs: SequencePolicy,
    /// Handling for an empty `broker.templates` sequence.
    pub empty_templates: SequencePolicy,
}

impl ValidationPolicy {
    /// Returns a policy admitting empty boundary sequences everywhere.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            empty_vcs: SequencePolicy::Accept,
            empty_templates: SequencePolicy::Accept,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
