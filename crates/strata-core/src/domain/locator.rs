//! Locator strings: `protocol://path`, optionally prefixed by wrappers.
//!
//! A locator names both a backend kind and a location within it:
//!
//! ```text
//! file:///srv/templates          protocol = "file",   path = "/srv/templates"
//! memory://site                  protocol = "memory", path = "site"
//! dir::file:///srv/templates     wrappers = ["dir"], protocol = "file", ...
//! ```
//!
//! Wrappers are listed outermost first, matching how they are written.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Separator between a protocol and its path.
pub const SCHEME_DELIMITER: &str = "://";

/// Separator between chained protocols.
pub const CHAIN_DELIMITER: &str = "::";

/// Whether `source` should be resolved as a locator rather than a bare
/// backend name.
pub fn is_locator(source: &str) -> bool {
    source.contains(SCHEME_DELIMITER)
}

/// A parsed locator string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    wrappers: Vec<String>,
    protocol: String,
    path: String,
}

impl Locator {
    /// Parse a locator string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLocator`] if the string has no
    /// `protocol://` part or if any protocol segment is empty.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidLocator {
            locator: input.to_string(),
            reason: reason.to_string(),
        };

        let (head, path) = input
            .split_once(SCHEME_DELIMITER)
            .ok_or_else(|| invalid("missing '://'"))?;

        let mut segments: Vec<&str> = head.split(CHAIN_DELIMITER).collect();
        let protocol = segments.pop().unwrap_or_default();

        if protocol.is_empty() {
            return Err(invalid("empty protocol"));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("empty wrapper protocol"));
        }
        if !is_protocol_name(protocol) || !segments.iter().all(|s| is_protocol_name(s)) {
            return Err(invalid(
                "protocols may only contain letters, digits, '+', '-' and '.'",
            ));
        }

        Ok(Self {
            wrappers: segments.into_iter().map(str::to_ascii_lowercase).collect(),
            protocol: protocol.to_ascii_lowercase(),
            path: path.to_string(),
        })
    }

    /// Wrapper protocols, outermost first.
    pub fn wrappers(&self) -> &[String] {
        &self.wrappers
    }

    /// The innermost backend protocol.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Everything after `://`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_protocol_name(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for wrapper in &self.wrappers {
            write!(f, "{wrapper}{CHAIN_DELIMITER}")?;
        }
        write!(f, "{}{SCHEME_DELIMITER}{}", self.protocol, self.path)
    }
}

impl FromStr for Locator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
