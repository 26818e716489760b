//! Loaded template source as handed to a template engine.

use std::fmt;
use std::sync::Arc;

/// Staleness check returned with a template's source.
///
/// Returns `true` while the source the engine holds is still current.
pub type UpToDate = Arc<dyn Fn() -> bool + Send + Sync>;

/// A check that never reports stale.
pub fn always_fresh() -> UpToDate {
    Arc::new(|| true)
}

/// Source text of one template plus the metadata an engine needs to cache it.
#[derive(Clone)]
pub struct TemplateSource {
    /// Decoded template text.
    pub source: String,
    /// Normalized identifier of the file the text came from.
    pub path: String,
    uptodate: UpToDate,
}

impl TemplateSource {
    pub fn new(source: impl Into<String>, path: impl Into<String>, uptodate: UpToDate) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            uptodate,
        }
    }

    /// Run the staleness check.
    pub fn is_up_to_date(&self) -> bool {
        (self.uptodate)()
    }

    /// Shared handle to the staleness check, for engines that keep it after
    /// dropping the source.
    pub fn uptodate(&self) -> UpToDate {
        Arc::clone(&self.uptodate)
    }

    pub fn into_parts(self) -> (String, String, UpToDate) {
        (self.source, self.path, self.uptodate)
    }
}

impl fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSource")
            .field("path", &self.path)
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}
