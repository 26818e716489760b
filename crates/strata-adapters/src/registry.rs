//! Backend registry: locator resolution and named-backend construction.
//!
//! Protocols map to factories. Built instances are cached per
//! `(protocol, options)` so that asking for the same backend twice hands back
//! the same handle, which keeps loaders built from equal inputs equal. The
//! loader-level `search_path` option is not a backend option: it is neither
//! passed to factories nor part of the cache key.
//!
//! ```text
//! memory://site              -> MemoryFilesystem, path "site"
//! file:///srv/templates      -> LocalFilesystem,  path "/srv/templates"
//! dir::file:///srv/templates -> DirFilesystem(LocalFilesystem, "/srv/templates"), path ""
//! ```

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, RwLock},
};

use strata_core::{
    application::{
        ApplicationError,
        ports::{BackendResolver, Filesystem},
    },
    domain::{DomainError, Locator, SEARCH_PATH_KEY, StorageOptions},
    error::StrataResult,
};
use tracing::{debug, instrument};

use crate::filesystem::{DirFilesystem, LocalFilesystem, MemoryFilesystem};

/// Builds a backend from storage options.
pub type BackendFactory =
    Arc<dyn Fn(&StorageOptions) -> StrataResult<Arc<dyn Filesystem>> + Send + Sync>;

/// Thread-safe protocol registry with an instance cache.
#[derive(Clone)]
pub struct BackendRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

#[derive(Default)]
struct RegistryInner {
    factories: HashMap<String, BackendFactory>,
    instances: HashMap<(String, StorageOptions), Arc<dyn Filesystem>>,
}

impl BackendRegistry {
    /// Create a registry with no protocols.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
        }
    }

    /// Create a registry with the built-in protocols: `file`, `local`,
    /// `memory`.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.load_builtin();
        registry
    }

    /// Process-wide registry with the built-in protocols.
    pub fn global() -> &'static BackendRegistry {
        static GLOBAL: OnceLock<BackendRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtin)
    }

    fn load_builtin(&self) {
        let local: BackendFactory = Arc::new(local_factory);
        let memory: BackendFactory = Arc::new(memory_factory);

        // Only fails on a poisoned lock, which a fresh registry cannot have.
        let _ = self.register_factory(LocalFilesystem::PROTOCOL, Arc::clone(&local));
        let _ = self.register_factory("local", local);
        let _ = self.register_factory(MemoryFilesystem::PROTOCOL, memory);
    }

    /// Register (or replace) the factory for `protocol`.
    ///
    /// Cached instances of that protocol are dropped.
    pub fn register<F>(&self, protocol: &str, factory: F) -> StrataResult<()>
    where
        F: Fn(&StorageOptions) -> StrataResult<Arc<dyn Filesystem>> + Send + Sync + 'static,
    {
        self.register_factory(protocol, Arc::new(factory))
    }

    fn register_factory(&self, protocol: &str, factory: BackendFactory) -> StrataResult<()> {
        let protocol = protocol.to_ascii_lowercase();
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.instances.retain(|(p, _), _| *p != protocol);
        inner.factories.insert(protocol, factory);
        Ok(())
    }

    /// Registered protocol names, sorted.
    pub fn protocols(&self) -> StrataResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut names: Vec<String> = inner.factories.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Get or build the backend for `protocol` with `options`.
    fn instance(&self, protocol: &str, options: &StorageOptions) -> StrataResult<Arc<dyn Filesystem>> {
        let protocol = protocol.to_ascii_lowercase();
        let mut options = options.clone();
        options.remove(SEARCH_PATH_KEY);
        let key = (protocol.clone(), options);

        let factory = {
            let inner = self
                .inner
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;

            if let Some(fs) = inner.instances.get(&key) {
                return Ok(Arc::clone(fs));
            }

            inner
                .factories
                .get(&protocol)
                .cloned()
                .ok_or_else(|| ApplicationError::UnknownProtocol {
                    protocol: protocol.clone(),
                })?
        };

        // Build outside the lock; factories may be slow.
        let built = factory(&key.1)?;
        debug!(protocol = %protocol, token = %built.fs_token(), "built backend");

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(Arc::clone(inner.instances.entry(key).or_insert(built)))
    }
}

fn local_factory(_: &StorageOptions) -> StrataResult<Arc<dyn Filesystem>> {
    Ok(Arc::new(LocalFilesystem::new()))
}

fn memory_factory(_: &StorageOptions) -> StrataResult<Arc<dyn Filesystem>> {
    Ok(Arc::new(MemoryFilesystem::new()))
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("protocols", &self.protocols().unwrap_or_default())
            .finish()
    }
}

impl BackendResolver for BackendRegistry {
    #[instrument(skip(self, options))]
    fn resolve_locator(
        &self,
        locator: &str,
        options: &StorageOptions,
    ) -> StrataResult<(Arc<dyn Filesystem>, String)> {
        let parsed = Locator::parse(locator)?;

        let mut fs = self.instance(parsed.protocol(), options)?;
        let mut path = fs.strip_protocol(parsed.path());

        for wrapper in parsed.wrappers().iter().rev() {
            match wrapper.as_str() {
                DirFilesystem::PROTOCOL => {
                    fs = Arc::new(DirFilesystem::new(fs, std::mem::take(&mut path)));
                }
                other => {
                    return Err(ApplicationError::UnknownProtocol {
                        protocol: other.to_string(),
                    }
                    .into());
                }
            }
        }

        debug!(token = %fs.fs_token(), path = %path, "resolved locator");
        Ok((fs, path))
    }

    #[instrument(skip(self, options))]
    fn named_backend(
        &self,
        name: &str,
        options: &StorageOptions,
    ) -> StrataResult<Arc<dyn Filesystem>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptySource.into());
        }
        if name.eq_ignore_ascii_case(DirFilesystem::PROTOCOL) {
            return Err(DomainError::InvalidLocator {
                locator: name.to_string(),
                reason: "the dir wrapper needs a path, e.g. dir::file:///srv/templates".into(),
            }
            .into());
        }
        self.instance(name, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{domain::OptionValue, error::StrataError};

    #[test]
    fn builtin_protocols() {
        let registry = BackendRegistry::with_builtin();
        assert_eq!(registry.protocols().unwrap(), vec!["file", "local", "memory"]);
    }

    #[test]
    fn memory_locator_strips_slashes() {
        let registry = BackendRegistry::with_builtin();
        let (fs, path) = registry
            .resolve_locator("memory://data/", &StorageOptions::new())
            .unwrap();
        assert_eq!(fs.protocol(), "memory");
        assert_eq!(path, "data");
    }

    #[test]
    fn file_locator_keeps_absolute_path() {
        let registry = BackendRegistry::with_builtin();
        let (fs, path) = registry
            .resolve_locator("file:///srv/templates", &StorageOptions::new())
            .unwrap();
        assert_eq!(fs.protocol(), "file");
        assert_eq!(path, "/srv/templates");
    }

    #[test]
    fn dir_wrapper_moves_path_into_backend() {
        let registry = BackendRegistry::with_builtin();
        let (fs, path) = registry
            .resolve_locator("dir::memory://site", &StorageOptions::new())
            .unwrap();
        assert_eq!(fs.protocol(), "dir");
        assert_eq!(path, "");
        assert!(fs.fs_token().starts_with("dir:site:memory:"));
    }

    #[test]
    fn same_inputs_yield_same_instance() {
        let registry = BackendRegistry::with_builtin();
        let opts = StorageOptions::new().with("anon", true);

        let (a, _) = registry.resolve_locator("memory://x", &opts).unwrap();
        let (b, _) = registry.resolve_locator("memory://y", &opts).unwrap();
        let c = registry.named_backend("memory", &opts).unwrap();
        let d = registry.named_backend("memory", &StorageOptions::new()).unwrap();

        assert!(*a == *b);
        assert!(*a == *c);
        assert!(*a != *d);
    }

    #[test]
    fn search_path_does_not_split_backend_instances() {
        let registry = BackendRegistry::with_builtin();
        let plain = registry.named_backend("memory", &StorageOptions::new()).unwrap();
        let scoped = registry
            .named_backend("memory", &StorageOptions::new().with("search_path", "templates"))
            .unwrap();
        let other = registry
            .named_backend("memory", &StorageOptions::new().with("search_path", "2024"))
            .unwrap();

        assert!(*plain == *scoped);
        assert!(*scoped == *other);
    }

    #[test]
    fn factories_never_see_search_path() {
        let registry = BackendRegistry::new();
        registry
            .register("scratch", |options| {
                assert!(options.get("search_path").is_none());
                assert_eq!(options.get("depth"), Some(&OptionValue::Int(2)));
                Ok(Arc::new(MemoryFilesystem::new()) as Arc<dyn Filesystem>)
            })
            .unwrap();

        let options = StorageOptions::new()
            .with("search_path", "templates")
            .with("depth", 2_i64);
        assert!(registry.named_backend("scratch", &options).is_ok());
    }

    #[test]
    fn unknown_protocol() {
        let registry = BackendRegistry::with_builtin();
        let err = registry
            .resolve_locator("s3://bucket", &StorageOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::UnknownProtocol { ref protocol }) if protocol == "s3"
        ));
    }

    #[test]
    fn unknown_wrapper() {
        let registry = BackendRegistry::with_builtin();
        assert!(
            registry
                .resolve_locator("zip::memory://a", &StorageOptions::new())
                .is_err()
        );
    }

    #[test]
    fn bare_dir_is_rejected() {
        let registry = BackendRegistry::with_builtin();
        assert!(matches!(
            registry.named_backend("dir", &StorageOptions::new()),
            Err(StrataError::Domain(DomainError::InvalidLocator { .. }))
        ));
    }

    #[test]
    fn register_replaces_factory_and_cache() {
        let registry = BackendRegistry::with_builtin();
        let before = registry.named_backend("memory", &StorageOptions::new()).unwrap();

        let fixed = MemoryFilesystem::new();
        let token = fixed.fs_token();
        registry
            .register("memory", move |_| Ok(Arc::new(fixed.clone())))
            .unwrap();

        let after = registry.named_backend("memory", &StorageOptions::new()).unwrap();
        assert_ne!(before.fs_token(), after.fs_token());
        assert_eq!(after.fs_token(), token);
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(std::ptr::eq(BackendRegistry::global(), BackendRegistry::global()));
    }
}
