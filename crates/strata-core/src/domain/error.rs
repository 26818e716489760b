// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("Invalid storage option '{input}': {reason}")]
    InvalidOption { input: String, reason: String },

    #[error("Invalid render variable '{input}': {reason}")]
    InvalidVariable { input: String, reason: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("No filesystem source given: expected a locator, a backend name, or a filesystem")]
    EmptySource,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidLocator { locator, .. } => vec![
                format!("Could not parse locator: {}", locator),
                "Locators look like: file:///srv/templates or memory://site".into(),
                "Prefix with dir:: to root the backend at the path: dir::file:///srv/templates"
                    .into(),
            ],
            Self::InvalidOption { .. } => vec![
                "Storage options are written as KEY=VALUE".into(),
                "Example: --option search_path=templates".into(),
            ],
            Self::InvalidVariable { .. } => vec![
                "Render variables are written as KEY=VALUE".into(),
                "Example: --var name=World".into(),
            ],
            Self::EmptySource => vec![
                "Pass a source with --source, or set source.default in the config file".into(),
                "Example: strata list --source dir::file:///srv/templates".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLocator { .. } | Self::InvalidOption { .. } | Self::InvalidVariable { .. } => {
                ErrorCategory::Validation
            }
            Self::EmptySource => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}
