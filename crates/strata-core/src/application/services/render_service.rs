//! Render Service - render templates through an engine.
//!
//! Kept apart from [`TemplateService`](super::TemplateService): listing and
//! fetching need only a loader, rendering needs an engine.

use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateRenderer, domain::RenderContext, error::StrataResult,
};

/// Service for rendering templates.
pub struct RenderService {
    renderer: Box<dyn TemplateRenderer>,
}

impl RenderService {
    /// Create a new render service.
    pub fn new(renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// Render `name` with `context`.
    #[instrument(skip(self, context))]
    pub fn render(&self, name: &str, context: &RenderContext) -> StrataResult<String> {
        let output = self.renderer.render(name, context)?;
        debug!(bytes = output.len(), "rendered template");
        Ok(output)
    }
}
