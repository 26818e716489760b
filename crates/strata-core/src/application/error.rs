//! Application layer errors.
//!
//! These errors represent failures talking to backends and engines, not
//! malformed input. Input errors are `DomainError` from `crate::domain`.

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while loading or rendering templates.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The backend has no file for the requested template.
    ///
    /// `name` is the name the caller asked for, before any search-path
    /// prefix was applied.
    #[error("Template not found: {name}")]
    TemplateNotFound {
        name: String,
        #[source]
        source: Option<io::Error>,
    },

    /// Backend I/O failed for a reason other than a missing file.
    #[error("Filesystem error at {path}: {source}")]
    Backend {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Template bytes are not valid UTF-8.
    #[error("Template at {path} is not valid UTF-8")]
    Decode {
        path: String,
        #[source]
        source: FromUtf8Error,
    },

    /// No backend is registered under this protocol.
    #[error("Protocol not known: {protocol}")]
    UnknownProtocol { protocol: String },

    /// The template engine failed to render.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Shared state access failed (lock poisoned, etc.).
    #[error("Backend registry is unavailable")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name, .. } => vec![
                format!("No template named '{}' in the source", name),
                "Try: strata list to see available templates".into(),
                "Check --search-path if templates live in a sub-directory".into(),
            ],
            Self::Backend { path, .. } => vec![
                format!("Failed to access: {}", path),
                "Check that you have read permissions".into(),
            ],
            Self::Decode { path, .. } => vec![
                format!("'{}' is not UTF-8 text", path),
                "Only text templates can be loaded".into(),
            ],
            Self::UnknownProtocol { protocol } => vec![
                format!("No backend is registered for '{}'", protocol),
                "Built-in protocols: file, local, memory (wrapper: dir::)".into(),
            ],
            Self::StoreLockError => vec![
                "The backend registry is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the template syntax".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Backend { .. } | Self::Decode { .. } => ErrorCategory::Internal,
            Self::UnknownProtocol { .. } => ErrorCategory::Configuration,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
