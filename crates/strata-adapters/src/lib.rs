//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod registry;
pub mod renderer;
pub mod template_loader;

// Re-export commonly used adapters
pub use filesystem::{DirFilesystem, LocalFilesystem, MemoryFilesystem};
pub use registry::{BackendFactory, BackendRegistry};
pub use renderer::MiniJinjaRenderer;
pub use template_loader::{FsSource, FsTemplateLoader};
