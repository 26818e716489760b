//! Variables passed to a template when rendering.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::error::DomainError;

/// Ordered variable map handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    variables: BTreeMap<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Merge the top-level keys of a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidVariable`] if `value` is not an object.
    pub fn extend_from_json(&mut self, value: Value) -> Result<(), DomainError> {
        match value {
            Value::Object(map) => {
                self.variables.extend(map);
                Ok(())
            }
            other => Err(DomainError::InvalidVariable {
                input: other.to_string(),
                reason: "variables file must contain a JSON object".into(),
            }),
        }
    }

    /// Insert a `KEY=VALUE` pair as written on the command line.
    ///
    /// The value is taken as JSON when it parses as JSON (numbers, booleans,
    /// arrays, quoted strings) and as a plain string otherwise.
    pub fn insert_pair(&mut self, input: &str) -> Result<(), DomainError> {
        let (key, raw) = input
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidVariable {
                input: input.to_string(),
                reason: "expected KEY=VALUE".into(),
            })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidVariable {
                input: input.to_string(),
                reason: "empty key".into(),
            });
        }

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pairs_parse_json_or_fall_back_to_string() {
        let mut ctx = RenderContext::new();
        ctx.insert_pair("name=World").unwrap();
        ctx.insert_pair("count=3").unwrap();
        ctx.insert_pair("tags=[\"a\",\"b\"]").unwrap();

        assert_eq!(ctx.get("name"), Some(&json!("World")));
        assert_eq!(ctx.get("count"), Some(&json!(3)));
        assert_eq!(ctx.get("tags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn pair_without_equals_is_rejected() {
        let mut ctx = RenderContext::new();
        assert!(matches!(
            ctx.insert_pair("oops"),
            Err(DomainError::InvalidVariable { .. })
        ));
    }

    #[test]
    fn json_object_is_merged() {
        let mut ctx = RenderContext::new().with("a", 1);
        ctx.extend_from_json(json!({"b": true, "a": 2})).unwrap();
        assert_eq!(ctx.get("a"), Some(&json!(2)));
        assert_eq!(ctx.get("b"), Some(&json!(true)));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let mut ctx = RenderContext::new();
        assert!(ctx.extend_from_json(json!([1, 2])).is_err());
    }
}
