//! In-memory filesystem adapter.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{self, Cursor, Read},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use strata_core::{
    application::ports::{Filesystem, WalkEntry},
    domain::normalize_posix,
};
use uuid::Uuid;

/// In-memory filesystem.
///
/// Keys are relative `/`-separated paths with no leading separator; the root
/// marker is the empty string. Clones share the same store and compare equal.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    id: Uuid,
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFilesystem {
    pub const PROTOCOL: &'static str = "memory";

    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Store `content` at `path`, replacing any previous content.
    pub fn write_file(&self, path: &str, content: impl Into<Vec<u8>>) -> io::Result<()> {
        let key = normalize_key(path);
        if key.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot write to the root",
            ));
        }
        if escapes_root(&key) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{path} climbs above the root"),
            ));
        }
        self.write()?.files.insert(key, content.into());
        Ok(())
    }

    fn read(&self) -> io::Result<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_error())
    }

    fn write(&self) -> io::Result<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_error())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn protocol(&self) -> &str {
        Self::PROTOCOL
    }

    fn root_marker(&self) -> &str {
        ""
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let key = normalize_key(path);
        let inner = self.read()?;
        let bytes = inner.files.get(&key).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{path} not found"))
        })?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn walk(&self, root: &str) -> io::Result<Vec<WalkEntry>> {
        let root = normalize_key(root);
        let inner = self.read()?;

        let mut entries = Vec::new();
        if root.is_empty() || is_dir(&inner.files, &root) {
            walk_into(&inner.files, root, &mut entries);
        }
        Ok(entries)
    }

    fn strip_protocol(&self, path: &str) -> String {
        normalize_key(path)
    }

    fn fs_token(&self) -> String {
        format!("{}:{}", Self::PROTOCOL, self.id)
    }
}

fn walk_into(files: &BTreeMap<String, Vec<u8>>, dir: String, out: &mut Vec<WalkEntry>) {
    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    };

    let mut dirs = BTreeSet::new();
    let mut names = Vec::new();
    for key in files.keys().filter(|k| k.starts_with(&prefix)) {
        match key[prefix.len()..].split_once('/') {
            Some((sub, _)) => {
                dirs.insert(sub.to_string());
            }
            None => names.push(key[prefix.len()..].to_string()),
        }
    }

    let subdirs: Vec<String> = dirs.into_iter().collect();
    out.push(WalkEntry {
        path: dir,
        dirs: subdirs.clone(),
        files: names,
    });

    for sub in subdirs {
        walk_into(files, format!("{prefix}{sub}"), out);
    }
}

fn is_dir(files: &BTreeMap<String, Vec<u8>>, dir: &str) -> bool {
    let prefix = format!("{dir}/");
    files.keys().any(|k| k.starts_with(&prefix))
}

/// Relative key for `path`: leading slashes dropped, `.` and `..` resolved.
///
/// Keys that climb above the root keep their leading `..` and never match a
/// stored file.
fn normalize_key(path: &str) -> String {
    match normalize_posix(path.trim_start_matches(['/', '\\'])).as_str() {
        "." => String::new(),
        key => key.to_string(),
    }
}

fn escapes_root(key: &str) -> bool {
    key == ".." || key.starts_with("../")
}

fn lock_error() -> io::Error {
    io::Error::other("memory filesystem lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(fs: &MemoryFilesystem, path: &str) -> io::Result<String> {
        let mut s = String::new();
        fs.open(path)?.read_to_string(&mut s)?;
        Ok(s)
    }

    #[test]
    fn write_then_open() {
        let fs = MemoryFilesystem::new();
        fs.write_file("/sub/b.html", "B").unwrap();
        assert_eq!(read(&fs, "sub/b.html").unwrap(), "B");
        assert_eq!(read(&fs, "/sub//b.html").unwrap(), "B");
    }

    #[test]
    fn open_missing_is_not_found() {
        let fs = MemoryFilesystem::new();
        let err = fs.open("nope").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn open_directory_is_not_found() {
        let fs = MemoryFilesystem::new();
        fs.write_file("sub/b.html", "B").unwrap();
        assert_eq!(fs.open("sub").err().unwrap().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn writing_to_root_is_rejected() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file("/", "x").is_err());
    }

    #[test]
    fn walk_yields_root_then_subdirs() {
        let fs = MemoryFilesystem::new();
        fs.write_file("a.html", "A").unwrap();
        fs.write_file("sub/b.html", "B").unwrap();
        fs.write_file("sub/inner/c.html", "C").unwrap();
        fs.write_file("z/d.html", "D").unwrap();

        let entries = fs.walk(fs.root_marker()).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths, vec!["", "sub", "sub/inner", "z"]);
        assert_eq!(entries[0].files, vec!["a.html"]);
        assert_eq!(entries[0].dirs, vec!["sub", "z"]);
        assert_eq!(entries[1].files, vec!["b.html"]);
        assert_eq!(entries[2].files, vec!["c.html"]);
    }

    #[test]
    fn walk_of_subdir_and_missing_dir() {
        let fs = MemoryFilesystem::new();
        fs.write_file("sub/b.html", "B").unwrap();

        let entries = fs.walk("sub").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "sub");

        assert!(fs.walk("missing").unwrap().is_empty());
    }

    #[test]
    fn clones_share_store_and_compare_equal() {
        let a = MemoryFilesystem::new();
        let b = a.clone();
        b.write_file("x", "1").unwrap();

        assert_eq!(read(&a, "x").unwrap(), "1");
        assert_eq!(a.fs_token(), b.fs_token());
        assert_ne!(a.fs_token(), MemoryFilesystem::new().fs_token());
    }

    #[test]
    fn parent_segments_resolve_within_the_store() {
        let fs = MemoryFilesystem::new();
        fs.write_file("sub/b.html", "B").unwrap();

        assert_eq!(read(&fs, "./sub/../sub/b.html").unwrap(), "B");
        assert_eq!(read(&fs, "sub/inner/../b.html").unwrap(), "B");
        assert_eq!(
            fs.open("../sub/b.html").err().unwrap().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn writing_above_the_root_is_rejected() {
        let fs = MemoryFilesystem::new();
        let err = fs.write_file("../outside.html", "x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(fs.write_file("sub/../../x", "x").is_err());
    }

    #[test]
    fn strip_protocol_normalizes() {
        let fs = MemoryFilesystem::new();
        assert_eq!(fs.strip_protocol("/data/"), "data");
        assert_eq!(fs.strip_protocol(""), "");
    }
}
