//! Common error infrastructure for battle-core.
//!
//! Setup-time failures are the only errors the engine ever returns. Once a
//! [`BattleState`](crate::BattleState) exists, invariant violations are clamped
//! and malformed actions degrade to no-op turns instead of surfacing here.
//!
//! # Design Principles
//!
//! - **Fail fast**: configuration errors stop a battle before its first action
//! - **Rich Context**: errors name the offending unit, position, or skill
//! - **Severity Classification**: errors are categorized for recovery strategies

use crate::state::{GridPos, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: unit placed off the board, star level 4
    Validation,

    /// Data that can never produce a valid battle.
    ///
    /// Examples: unknown effect tag, skill reference missing from the catalog
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if the error stems from broken content data.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit being built when the error occurred (if applicable).
    pub unit: Option<UnitId>,

    /// Requested grid position (if applicable).
    pub position: Option<GridPos>,

    /// Template id from the roster entry (if applicable).
    pub template: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a unit to this context (builder pattern).
    #[must_use]
    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Attaches a grid position to this context (builder pattern).
    #[must_use]
    pub fn with_position(mut self, position: GridPos) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a roster template id to this context (builder pattern).
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants that reference roster entries
/// - Classify severity by whether fixing the input could ever help
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
