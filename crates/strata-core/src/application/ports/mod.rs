//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: path-based storage backend
//!   - `BackendResolver`: locator and backend-name resolution
//!   - `TemplateLoader`: template listing and source retrieval
//!   - `TemplateRenderer`: template rendering
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{BackendResolver, Filesystem, TemplateLoader, TemplateRenderer, WalkEntry};
