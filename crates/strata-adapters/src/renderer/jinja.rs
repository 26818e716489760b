//! MiniJinja renderer backed by a [`TemplateLoader`].

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, RwLock},
};

use minijinja::{Environment, Error, ErrorKind};
use strata_core::{
    application::{
        ApplicationError,
        ports::{TemplateLoader, TemplateRenderer},
    },
    domain::{RenderContext, UpToDate},
    error::{StrataError, StrataResult},
};
use tracing::{debug, instrument};

type Freshness = Arc<Mutex<HashMap<String, UpToDate>>>;

/// Renders templates through a MiniJinja environment whose loader hook is a
/// [`TemplateLoader`].
///
/// Includes and extends go through the same loader. Compiled templates are
/// cached by the environment and dropped once any of their staleness checks
/// reports false.
pub struct MiniJinjaRenderer {
    env: RwLock<Environment<'static>>,
    freshness: Freshness,
}

impl MiniJinjaRenderer {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        let freshness: Freshness = Arc::default();

        let mut env = Environment::new();
        let seen = Arc::clone(&freshness);
        env.set_loader(move |name| load(loader.as_ref(), &seen, name));

        Self {
            env: RwLock::new(env),
            freshness,
        }
    }

    /// Drop every compiled template so the next render reloads from the
    /// backend.
    pub fn reload(&self) -> StrataResult<()> {
        let mut env = self.env.write().map_err(|_| ApplicationError::StoreLockError)?;
        env.clear_templates();
        self.freshness
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .clear();
        debug!("template cache cleared");
        Ok(())
    }

    fn any_stale(&self) -> StrataResult<bool> {
        let seen = self
            .freshness
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(seen.values().any(|uptodate| !uptodate()))
    }
}

/// Loader hook: a missing template is `Ok(None)`, anything else an error.
fn load(loader: &dyn TemplateLoader, seen: &Freshness, name: &str) -> Result<Option<String>, Error> {
    match loader.get_source(name) {
        Ok(template) => {
            let (source, path, uptodate) = template.into_parts();
            debug!(name, path = %path, "engine loaded template");
            seen.lock()
                .map_err(|_| engine_error(ApplicationError::StoreLockError.into()))?
                .insert(name.to_string(), uptodate);
            Ok(Some(source))
        }
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(engine_error(err)),
    }
}

fn engine_error(err: StrataError) -> Error {
    Error::new(ErrorKind::InvalidOperation, "template loader failed").with_source(err)
}

impl TemplateRenderer for MiniJinjaRenderer {
    #[instrument(skip(self, context))]
    fn render(&self, name: &str, context: &RenderContext) -> StrataResult<String> {
        if self.any_stale()? {
            debug!("stale template detected");
            self.reload()?;
        }

        let env = self.env.read().map_err(|_| ApplicationError::StoreLockError)?;

        let template = env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ApplicationError::TemplateNotFound {
                name: name.to_string(),
                source: None,
            },
            _ => rendering_failed(&e),
        })?;

        template
            .render(context)
            .map_err(|e| rendering_failed(&e).into())
    }
}

/// Flatten an engine error and its source chain into one message.
fn rendering_failed(err: &Error) -> ApplicationError {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    ApplicationError::RenderingFailed { reason }
}

impl fmt::Debug for MiniJinjaRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaRenderer").finish_non_exhaustive()
    }
}
