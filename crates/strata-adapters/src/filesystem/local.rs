//! Local filesystem adapter using std::fs and walkdir.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use strata_core::application::ports::{Filesystem, WalkEntry};
use tracing::debug;
use walkdir::WalkDir;

/// Host filesystem backend.
///
/// Paths are host paths; the root marker is `/`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub const PROTOCOL: &'static str = "file";

    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn protocol(&self) -> &str {
        Self::PROTOCOL
    }

    fn root_marker(&self) -> &str {
        "/"
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(path)?;
        // Opening a directory succeeds on unix; reading it does not.
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path} is a directory"),
            ));
        }
        Ok(Box::new(file))
    }

    fn walk(&self, root: &str) -> io::Result<Vec<WalkEntry>> {
        let root_path = Path::new(root);
        if !root_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<WalkEntry> = Vec::new();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();

        let walker = WalkDir::new(root_path).sort_by_file_name().into_iter();
        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    // Unreadable sub-trees are left out, like a top-down walk
                    // that omits errors.
                    debug!(error = %e, "skipping unreadable entry during walk");
                    continue;
                }
            };

            let name = item.file_name().to_string_lossy().into_owned();
            let parent = item.path().parent().map(Path::to_path_buf);

            if item.file_type().is_dir() {
                if item.depth() > 0 {
                    if let Some(&i) = parent.as_ref().and_then(|p| index.get(p)) {
                        entries[i].dirs.push(name);
                    }
                }
                index.insert(item.path().to_path_buf(), entries.len());
                entries.push(WalkEntry::new(display_dir(item.path())));
            } else if let Some(&i) = parent.as_ref().and_then(|p| index.get(p)) {
                entries[i].files.push(name);
            }
        }

        Ok(entries)
    }

    fn strip_protocol(&self, path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() && path.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn fs_token(&self) -> String {
        Self::PROTOCOL.to_string()
    }
}

/// Directory path as yielded by a walk: forward slashes, no trailing
/// separator, so the host root becomes the empty string.
fn display_dir(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    text.trim_end_matches('/').to_string()
}
