//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Strata, which
//! loads template source from any filesystem backend and hands it to a
//! template engine. It follows hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │     (list / show / render commands)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (TemplateService, RenderService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, BackendResolver,           │
//! │  TemplateLoader, TemplateRenderer)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      strata-adapters (Infrastructure)   │
//! │ (LocalFilesystem, BackendRegistry,      │
//! │  FsTemplateLoader, MiniJinjaRenderer)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Locator, StorageOptions, TemplatePath) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use strata_core::application::{TemplateService, ports::TemplateLoader};
//! use strata_core::error::StrataResult;
//!
//! // `loader` is any `TemplateLoader`, e.g. `strata_adapters::FsTemplateLoader`.
//! fn print_html(loader: Arc<dyn TemplateLoader>) -> StrataResult<()> {
//!     let service = TemplateService::new(loader);
//!     for name in service.list(&["html".to_string()])? {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        RenderService, TemplateService,
        ports::{BackendResolver, Filesystem, TemplateLoader, TemplateRenderer, WalkEntry},
    };
    pub use crate::domain::{
        Locator, OptionValue, RenderContext, StorageOptions, TemplateSource, UpToDate,
    };
    pub use crate::error::{StrataError, StrataResult};
}
