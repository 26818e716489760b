//! Template rendering adapters.

mod jinja;

pub use self::jinja::MiniJinjaRenderer;
