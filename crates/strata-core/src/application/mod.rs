//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (TemplateService, RenderService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but performs no I/O
//! itself. All I/O lives behind the ports.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{RenderService, TemplateService};

// Re-export port traits (for adapter implementation)
pub use ports::{BackendResolver, Filesystem, TemplateLoader, TemplateRenderer, WalkEntry};

pub use error::ApplicationError;
