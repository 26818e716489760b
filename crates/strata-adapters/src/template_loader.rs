//! Filesystem-backed template loader.
//!
//! [`FsTemplateLoader`] lets a template engine read template source from any
//! [`Filesystem`] backend: host disk, an in-memory store, or a sub-tree of
//! another backend.
//!
//! # Sources
//!
//! ```text
//! "dir::file:///srv/site"   locator  -> resolved by the BackendResolver
//! "memory"                  name     -> built by the BackendResolver
//! Arc<dyn Filesystem>       handle   -> used as is
//! ```
//!
//! # Search path
//!
//! The reserved storage option `search_path` is prepended to every requested
//! name (`search_path/name`). Errors still report the name as requested.
//!
//! # Example
//!
//! ```no_run
//! use strata_adapters::FsTemplateLoader;
//! use strata_core::domain::StorageOptions;
//!
//! let options = StorageOptions::new().with("search_path", "templates");
//! let loader = FsTemplateLoader::new("dir::file:///srv/site", options)?;
//! let page = loader.get_source("index.html")?;
//! println!("{}", page.source);
//! # Ok::<(), strata_core::error::StrataError>(())
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    io::{self, Read},
    sync::Arc,
};

use strata_core::{
    application::{
        ApplicationError,
        ports::{BackendResolver, Filesystem, TemplateLoader},
    },
    domain::{
        DomainError, StorageOptions, TemplateSource, always_fresh, is_locator, lookup_path,
        normalize_posix,
    },
    error::StrataResult,
};
use tracing::{debug, instrument};

use crate::registry::BackendRegistry;

// ── Source ────────────────────────────────────────────────────────────────────

/// What a loader is built from.
#[derive(Debug, Clone)]
pub enum FsSource {
    /// `protocol://path`, optionally with `wrapper::` prefixes.
    Locator(String),
    /// A bare protocol name such as `"memory"`.
    Backend(String),
    /// An already-built backend.
    Handle(Arc<dyn Filesystem>),
}

impl FsSource {
    /// Classify a string: anything containing `://` is a locator.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        if is_locator(&source) {
            Self::Locator(source)
        } else {
            Self::Backend(source)
        }
    }
}

impl From<&str> for FsSource {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for FsSource {
    fn from(s: String) -> Self {
        Self::parse(s)
    }
}

impl From<Arc<dyn Filesystem>> for FsSource {
    fn from(fs: Arc<dyn Filesystem>) -> Self {
        Self::Handle(fs)
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Template loader over a [`Filesystem`] backend.
///
/// Equality and hashing follow the storage options, the backend identity and
/// the root path; the search path takes part only through the options.
#[derive(Clone)]
pub struct FsTemplateLoader {
    filesystem: Arc<dyn Filesystem>,
    root_path: String,
    storage_options: StorageOptions,
    search_path: Option<String>,
}

impl FsTemplateLoader {
    /// Loader identifier exposed to template engines.
    pub const ID: &'static str = "fsspec";

    /// Build a loader, resolving string sources through
    /// [`BackendRegistry::global`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptySource`] for an empty source string
    /// - [`DomainError::InvalidLocator`] for a malformed locator
    /// - [`ApplicationError::UnknownProtocol`] for an unregistered protocol
    pub fn new(source: impl Into<FsSource>, options: StorageOptions) -> StrataResult<Self> {
        Self::with_resolver(source, options, BackendRegistry::global())
    }

    /// Build a loader, resolving string sources through `resolver`.
    #[instrument(skip_all)]
    pub fn with_resolver(
        source: impl Into<FsSource>,
        options: StorageOptions,
        resolver: &dyn BackendResolver,
    ) -> StrataResult<Self> {
        let (filesystem, root_path) = match source.into() {
            FsSource::Locator(s) | FsSource::Backend(s) if s.trim().is_empty() => {
                return Err(DomainError::EmptySource.into());
            }
            FsSource::Locator(locator) => resolver.resolve_locator(&locator, &options)?,
            FsSource::Backend(name) => (resolver.named_backend(&name, &options)?, String::new()),
            FsSource::Handle(fs) => (fs, String::new()),
        };

        let search_path = options.search_path().map(str::to_string);

        debug!(
            protocol = filesystem.protocol(),
            root_path = %root_path,
            search_path = ?search_path,
            "template loader ready"
        );

        Ok(Self {
            filesystem,
            root_path,
            storage_options: options,
            search_path,
        })
    }

    /// Build a loader directly over a backend handle.
    pub fn from_filesystem(filesystem: Arc<dyn Filesystem>, options: StorageOptions) -> Self {
        let search_path = options.search_path().map(str::to_string);
        Self {
            filesystem,
            root_path: String::new(),
            storage_options: options,
            search_path,
        }
    }

    pub fn filesystem(&self) -> &Arc<dyn Filesystem> {
        &self.filesystem
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn storage_options(&self) -> &StorageOptions {
        &self.storage_options
    }

    pub fn search_path(&self) -> Option<&str> {
        self.search_path.as_deref()
    }

    /// Every file under the backend's root marker, in walk order.
    ///
    /// Files directly in a directory named by the empty string are listed
    /// bare; all others as `directory + sep + file`.
    #[instrument(skip(self), fields(protocol = self.filesystem.protocol()))]
    pub fn list_templates(&self) -> StrataResult<Vec<String>> {
        let root = self.filesystem.root_marker();
        let sep = self.filesystem.sep();

        let entries = self
            .filesystem
            .walk(root)
            .map_err(|source| ApplicationError::Backend {
                path: root.to_string(),
                source,
            })?;

        let names: Vec<String> = entries
            .into_iter()
            .flat_map(|entry| {
                let dir = entry.path;
                entry.files.into_iter().map(move |file| {
                    if dir.is_empty() {
                        file
                    } else {
                        format!("{dir}{sep}{file}")
                    }
                })
            })
            .collect();

        debug!(count = names.len(), "listed templates");
        Ok(names)
    }

    /// Load `name` from the backend.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::TemplateNotFound`] carrying `name` (without the
    ///   search path) when the backend reports the file missing
    /// - [`ApplicationError::Backend`] for any other I/O failure
    /// - [`ApplicationError::Decode`] when the bytes are not UTF-8
    #[instrument(skip(self))]
    pub fn get_source(&self, name: &str) -> StrataResult<TemplateSource> {
        let path = lookup_path(self.search_path.as_deref(), name);

        let bytes = self.read_all(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ApplicationError::TemplateNotFound {
                    name: name.to_string(),
                    source: Some(source),
                }
            } else {
                ApplicationError::Backend {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let text = String::from_utf8(bytes).map_err(|source| ApplicationError::Decode {
            path: path.clone(),
            source,
        })?;

        let normalized = normalize_posix(&path);
        debug!(path = %normalized, bytes = text.len(), "loaded template");
        Ok(TemplateSource::new(text, normalized, always_fresh()))
    }

    /// Read a whole file; the reader is dropped before returning.
    fn read_all(&self, path: &str) -> io::Result<Vec<u8>> {
        let mut reader = self.filesystem.open(path)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl TemplateLoader for FsTemplateLoader {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn list_templates(&self) -> StrataResult<Vec<String>> {
        FsTemplateLoader::list_templates(self)
    }

    fn get_source(&self, name: &str) -> StrataResult<TemplateSource> {
        FsTemplateLoader::get_source(self, name)
    }
}

impl PartialEq for FsTemplateLoader {
    fn eq(&self, other: &Self) -> bool {
        self.storage_options == other.storage_options
            && *self.filesystem == *other.filesystem
            && self.root_path == other.root_path
    }
}

impl Eq for FsTemplateLoader {}

impl Hash for FsTemplateLoader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.storage_options.hash(state);
        self.filesystem.hash(state);
        self.root_path.hash(state);
    }
}

impl fmt::Debug for FsTemplateLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsTemplateLoader")
            .field("filesystem", &self.filesystem.fs_token())
            .field("root_path", &self.root_path)
            .field("storage_options", &self.storage_options)
            .field("search_path", &self.search_path)
            .finish()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
