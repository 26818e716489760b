//! Domain layer for Strata.
//!
//! Pure value types with no I/O:
//! - [`Locator`]: parsed `protocol://path` strings
//! - [`StorageOptions`]: backend configuration mapping
//! - [`template_path`]: search-path joins and POSIX normalization
//! - [`TemplateSource`]: loaded text plus its staleness check
//! - [`RenderContext`]: variables for rendering

pub mod error;
pub mod locator;
pub mod options;
pub mod render_context;
pub mod template_path;
pub mod template_source;

pub use error::{DomainError, ErrorCategory};
pub use locator::{Locator, is_locator};
pub use options::{OptionValue, SEARCH_PATH_KEY, StorageOptions};
pub use render_context::RenderContext;
pub use template_path::{has_extension, lookup_path, normalize_posix};
pub use template_source::{TemplateSource, UpToDate, always_fresh};
