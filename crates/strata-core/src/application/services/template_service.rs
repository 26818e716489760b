//! Template Service - template discovery and retrieval.
//!
//! Wraps a [`TemplateLoader`] with the queries callers actually make:
//! listing by extension, fetching source, checking existence.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateLoader,
    domain::{TemplateSource, has_extension},
    error::StrataResult,
};

/// Service for template lookups.
pub struct TemplateService {
    loader: Arc<dyn TemplateLoader>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        Self { loader }
    }

    /// List template names, keeping only those with one of `extensions`.
    ///
    /// An empty slice keeps everything. Order is the loader's order.
    #[instrument(skip(self), fields(loader = self.loader.id()))]
    pub fn list(&self, extensions: &[String]) -> StrataResult<Vec<String>> {
        let names: Vec<String> = self
            .loader
            .list_templates()?
            .into_iter()
            .filter(|name| has_extension(name, extensions))
            .collect();

        debug!(count = names.len(), "listed templates");
        Ok(names)
    }

    /// Fetch a template's source.
    pub fn source(&self, name: &str) -> StrataResult<TemplateSource> {
        self.loader.get_source(name)
    }

    /// Whether `name` can be loaded. Errors other than not-found propagate.
    pub fn exists(&self, name: &str) -> StrataResult<bool> {
        match self.loader.get_source(name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The underlying loader.
    pub fn loader(&self) -> &Arc<dyn TemplateLoader> {
        &self.loader
    }
}

impl From<Arc<dyn TemplateLoader>> for TemplateService {
    fn from(loader: Arc<dyn TemplateLoader>) -> Self {
        Self::new(loader)
    }
}
