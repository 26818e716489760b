//! Template name to lookup path resolution.
//!
//! Lookups are purely syntactic: nothing here touches a filesystem.

/// Separator used for search-path joins and normalized identifiers.
pub const POSIX_SEP: char = '/';

/// Build the backend lookup path for `name`.
///
/// With a search path the result is `search_path + "/" + name`; otherwise
/// `name` is returned unchanged.
pub fn lookup_path(search_path: Option<&str>, name: &str) -> String {
    match search_path {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{POSIX_SEP}{name}"),
        _ => name.to_string(),
    }
}

/// POSIX-normalize a path without consulting any filesystem.
///
/// - backslashes become forward slashes
/// - repeated separators and `.` segments are dropped
/// - `..` removes the preceding segment; at the top of an absolute path it
///   is dropped, at the top of a relative path it is kept
/// - an empty result is `"."`
pub fn normalize_posix(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with(POSIX_SEP);

    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split(POSIX_SEP) {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Whether `name` has one of `extensions` (compared without the dot).
///
/// An empty extension list matches everything.
pub fn has_extension(name: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        _ => false,
    }
}
