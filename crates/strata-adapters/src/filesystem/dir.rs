//! Prefix wrapper: re-roots any backend at a base path.

use std::io::{self, Read};
use std::sync::Arc;

use strata_core::{
    application::ports::{Filesystem, WalkEntry},
    domain::normalize_posix,
};

/// A view of `inner` rooted at `base`.
///
/// Paths given to this backend are relative to `base`; the root marker is
/// the empty string. Paths that climb out of `base` are refused.
#[derive(Debug, Clone)]
pub struct DirFilesystem {
    base: String,
    inner: Arc<dyn Filesystem>,
}

impl DirFilesystem {
    pub const PROTOCOL: &'static str = "dir";

    pub fn new(inner: Arc<dyn Filesystem>, base: impl Into<String>) -> Self {
        let base = base.into();
        let sep = inner.sep().to_string();
        // Keep a lone root marker such as "/" intact.
        let trimmed = base.trim_end_matches(sep.as_str());
        let base = if trimmed.is_empty() { base } else { trimmed.to_string() };
        Self { base, inner }
    }

    /// Map a path relative to `base` onto the inner backend.
    fn full_path(&self, path: &str) -> io::Result<String> {
        let relative = normalize_posix(path.trim_start_matches(['/', '\\']));
        if relative == ".." || relative.starts_with("../") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{path} escapes {}", self.base),
            ));
        }

        let sep = self.inner.sep();
        Ok(match (self.base.is_empty(), relative.as_str()) {
            (_, ".") => self.base.clone(),
            (true, rel) => rel.to_string(),
            (false, rel) if self.base.ends_with(sep) => format!("{}{rel}", self.base),
            (false, rel) => format!("{}{sep}{rel}", self.base),
        })
    }

    /// Strip `base` from a path yielded by the inner backend.
    fn relative_to_base(&self, path: &str) -> String {
        let sep = self.inner.sep();
        let base = self.base.trim_end_matches(sep);
        if path == base {
            return String::new();
        }
        path.strip_prefix(base)
            .and_then(|rest| rest.strip_prefix(sep))
            .unwrap_or(path)
            .to_string()
    }
}

impl Filesystem for DirFilesystem {
    fn protocol(&self) -> &str {
        Self::PROTOCOL
    }

    fn sep(&self) -> &str {
        self.inner.sep()
    }

    fn root_marker(&self) -> &str {
        ""
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        self.inner.open(&self.full_path(path)?)
    }

    fn walk(&self, root: &str) -> io::Result<Vec<WalkEntry>> {
        let entries = self.inner.walk(&self.full_path(root)?)?;
        Ok(entries
            .into_iter()
            .map(|entry| WalkEntry {
                path: self.relative_to_base(&entry.path),
                ..entry
            })
            .collect())
    }

    fn strip_protocol(&self, path: &str) -> String {
        path.trim_matches('/').to_string()
    }

    fn fs_token(&self) -> String {
        format!("{}:{}:{}", Self::PROTOCOL, self.base, self.inner.fs_token())
    }
}
