//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "list templates" or "render a template".

pub mod render_service;
pub mod template_service;

pub use render_service::RenderService;
pub use template_service::TemplateService;
