//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read};
use std::sync::Arc;

use crate::domain::{RenderContext, StorageOptions, TemplateSource};
use crate::error::StrataResult;

/// One directory visited by [`Filesystem::walk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkEntry {
    /// Directory path as the backend names it; empty for a backend's root.
    pub path: String,
    /// Names of immediate sub-directories.
    pub dirs: Vec<String>,
    /// Names of immediate files.
    pub files: Vec<String>,
}

impl WalkEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Port for a path-based storage backend.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (host disk)
/// - `strata_adapters::filesystem::MemoryFilesystem` (in-process map)
/// - `strata_adapters::filesystem::DirFilesystem` (any backend, re-rooted)
///
/// ## Design Notes
///
/// - Operations return `io::Result` so callers can tell `NotFound` apart
///   from other failures
/// - Identity for equality comes from [`Filesystem::fs_token`]
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Protocol name this backend is registered under, e.g. `"file"`.
    fn protocol(&self) -> &str;

    /// Path separator.
    fn sep(&self) -> &str {
        "/"
    }

    /// Path that names the top of the backend.
    fn root_marker(&self) -> &str;

    /// Open `path` for reading.
    ///
    /// Missing paths fail with [`io::ErrorKind::NotFound`].
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Walk the tree under `root`, top-down.
    ///
    /// The entry for `root` comes first, followed by each sub-directory in
    /// name order. A missing root yields no entries.
    fn walk(&self, root: &str) -> io::Result<Vec<WalkEntry>>;

    /// Turn the path part of a locator into a backend path.
    fn strip_protocol(&self, path: &str) -> String {
        path.to_string()
    }

    /// Identity token; two handles with the same token are the same backend.
    fn fs_token(&self) -> String;
}

impl PartialEq for dyn Filesystem + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.fs_token() == other.fs_token()
    }
}

impl Eq for dyn Filesystem + '_ {}

impl Hash for dyn Filesystem + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fs_token().hash(state);
    }
}

/// Port for turning locators and backend names into filesystem handles.
///
/// Implemented by `strata_adapters::BackendRegistry`.
pub trait BackendResolver: Send + Sync {
    /// Resolve a `protocol://path` locator into a handle and the path prefix
    /// it names within that backend.
    fn resolve_locator(
        &self,
        locator: &str,
        options: &StorageOptions,
    ) -> StrataResult<(Arc<dyn Filesystem>, String)>;

    /// Build a backend from its bare protocol name.
    fn named_backend(&self, name: &str, options: &StorageOptions)
    -> StrataResult<Arc<dyn Filesystem>>;
}

/// Port for a template engine's loader hook.
///
/// Implemented by `strata_adapters::FsTemplateLoader`.
pub trait TemplateLoader: Send + Sync {
    /// Identifier of the loader kind.
    fn id(&self) -> &'static str;

    /// Every template name the loader can serve.
    fn list_templates(&self) -> StrataResult<Vec<String>>;

    /// Fetch the source of `name`.
    ///
    /// Missing templates fail with
    /// [`ApplicationError::TemplateNotFound`](crate::application::ApplicationError::TemplateNotFound).
    fn get_source(&self, name: &str) -> StrataResult<TemplateSource>;
}

impl<T: TemplateLoader + ?Sized> TemplateLoader for Arc<T> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn list_templates(&self) -> StrataResult<Vec<String>> {
        (**self).list_templates()
    }

    fn get_source(&self, name: &str) -> StrataResult<TemplateSource> {
        (**self).get_source(name)
    }
}

/// Port for template rendering.
///
/// Implemented by:
/// - `strata_adapters::renderer::MiniJinjaRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render the template called `name` with `context`.
    fn render(&self, name: &str, context: &RenderContext) -> StrataResult<String>;
}
