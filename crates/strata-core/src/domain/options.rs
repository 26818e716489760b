//! Storage options passed to backend factories.
//!
//! Options are an ordered map so that equality and hashing do not depend on
//! insertion order. Values are restricted to hashable scalars.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// Reserved option key that the template loader promotes to its search path.
pub const SEARCH_PATH_KEY: &str = "search_path";

/// A single storage option value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Type text by shape: `true`/`false`, then integers, then strings.
    pub fn parse_typed(s: &str) -> Self {
        match s {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => s
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Str(s.to_string())),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl FromStr for OptionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_typed(s))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Open-ended configuration mapping for a filesystem backend.
///
/// The reserved [`SEARCH_PATH_KEY`] always holds text: scalars stored under
/// it are kept in their string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageOptions(BTreeMap<String, OptionValue>);

impl StorageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = coerce(&key, value.into());
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.0.remove(key)
    }

    /// The configured search path; an empty string counts as unset.
    pub fn search_path(&self) -> Option<&str> {
        self.get(SEARCH_PATH_KEY)
            .and_then(OptionValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a `KEY=VALUE` pair as written on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidOption`] if there is no `=` or the key is
    /// empty.
    pub fn parse_pair(input: &str) -> Result<(String, OptionValue), DomainError> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidOption {
                input: input.to_string(),
                reason: "expected KEY=VALUE".into(),
            })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidOption {
                input: input.to_string(),
                reason: "empty key".into(),
            });
        }

        let value = coerce(key, OptionValue::parse_typed(value));
        Ok((key.to_string(), value))
    }
}

fn coerce(key: &str, value: OptionValue) -> OptionValue {
    match value {
        OptionValue::Str(_) => value,
        other if key == SEARCH_PATH_KEY => OptionValue::Str(other.to_string()),
        other => other,
    }
}

impl FromIterator<(String, OptionValue)> for StorageOptions {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

impl<'de> Deserialize<'de> for StorageOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, OptionValue>::deserialize(deserializer)
            .map(|map| map.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StorageOptions {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(v: &T) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = StorageOptions::new().with("b", 1_i64).with("a", "x");
        let b = StorageOptions::new().with("a", "x").with("b", 1_i64);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn search_path_is_read_from_reserved_key() {
        let opts = StorageOptions::new().with(SEARCH_PATH_KEY, "templates");
        assert_eq!(opts.search_path(), Some("templates"));
    }

    #[test]
    fn empty_search_path_is_unset() {
        let opts = StorageOptions::new().with(SEARCH_PATH_KEY, "");
        assert_eq!(opts.search_path(), None);
    }

    #[test]
    fn scalar_search_path_is_kept_as_text() {
        let opts = StorageOptions::new().with(SEARCH_PATH_KEY, true);
        assert_eq!(opts.search_path(), Some("true"));
        let opts = StorageOptions::new().with(SEARCH_PATH_KEY, 7_i64);
        assert_eq!(opts.search_path(), Some("7"));
    }

    #[test]
    fn numeric_search_path_pair_stays_a_string() {
        let (key, value) = StorageOptions::parse_pair("search_path=2024").unwrap();
        assert_eq!(value, OptionValue::Str("2024".into()));

        let opts = StorageOptions::new().with(key, value);
        assert_eq!(opts.search_path(), Some("2024"));
        assert_eq!(
            StorageOptions::parse_pair("depth=2024").unwrap().1,
            OptionValue::Int(2024)
        );
    }

    #[test]
    fn parse_pair_types_values() {
        assert_eq!(
            StorageOptions::parse_pair("auto_mkdir=true").unwrap(),
            ("auto_mkdir".to_string(), OptionValue::Bool(true))
        );
        assert_eq!(
            StorageOptions::parse_pair("block_size=4096").unwrap().1,
            OptionValue::Int(4096)
        );
        assert_eq!(
            StorageOptions::parse_pair("search_path=a=b").unwrap().1,
            OptionValue::Str("a=b".into())
        );
    }

    #[test]
    fn parse_pair_rejects_garbage() {
        assert!(StorageOptions::parse_pair("novalue").is_err());
        assert!(StorageOptions::parse_pair("=x").is_err());
    }

    #[test]
    fn deserialises_from_json_scalars() {
        let opts: StorageOptions =
            serde_json::from_str(r#"{"search_path": "t", "auto_mkdir": false, "n": 3}"#).unwrap();
        assert_eq!(opts.search_path(), Some("t"));
        assert_eq!(opts.get("auto_mkdir").and_then(OptionValue::as_bool), Some(false));
        assert_eq!(opts.get("n"), Some(&OptionValue::Int(3)));
    }

    #[test]
    fn deserialised_numeric_search_path_is_text() {
        let opts: StorageOptions = serde_json::from_str(r#"{"search_path": 2024}"#).unwrap();
        assert_eq!(opts.search_path(), Some("2024"));
    }
}
