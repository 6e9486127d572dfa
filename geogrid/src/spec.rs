//! Key-value grid parametrisation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GridError;

/// Grid/projection parametrisation: an ordered key-value map with typed
/// access. Grids and projections are selected through their registered
/// `"type"` (or shorthand `"grid"` name) and read their parameters from the
/// remaining keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GridSpec {
    map: Map<String, Value>,
}

impl GridSpec {
    /// Creates an empty parametrisation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, GridError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(GridError::Spec(format!("expected an object, got {other}"))),
        }
    }

    /// Sets a key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.map.insert(key.to_string(), value.into());
        self
    }

    /// Whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// String value of a key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a key.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(Value::as_bool)
    }

    /// Unsigned integer value of a key.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.map.get(key).and_then(Value::as_u64)
    }

    /// Signed integer value of a key.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_i64)
    }

    /// Floating-point value of a key; integers coerce.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    /// Floating-point array value of a key.
    pub fn get_f64s(&self, key: &str) -> Option<Vec<f64>> {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .and_then(|a| a.iter().map(Value::as_f64).collect())
    }

    /// Signed integer array value of a key.
    pub fn get_i64s(&self, key: &str) -> Option<Vec<i64>> {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .and_then(|a| a.iter().map(Value::as_i64).collect())
    }

    /// String value of a key, or an error naming the key.
    pub fn require_str(&self, key: &str) -> Result<&str, GridError> {
        self.get_str(key)
            .ok_or_else(|| GridError::Spec(format!("missing string '{key}'")))
    }

    /// Unsigned integer value of a key, or an error naming the key.
    pub fn require_u64(&self, key: &str) -> Result<u64, GridError> {
        self.get_u64(key)
            .ok_or_else(|| GridError::Spec(format!("missing unsigned '{key}'")))
    }

    /// Floating-point value of a key, or an error naming the key.
    pub fn require_f64(&self, key: &str) -> Result<f64, GridError> {
        self.get_f64(key)
            .ok_or_else(|| GridError::Spec(format!("missing number '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn typed_getters() {
        let spec = GridSpec::from_value(json!({
            "type": "regular_ll",
            "ni": 360,
            "west_east_increment": 1.0,
            "periodic": true,
            "pl": [20, 24, 24, 20],
        }))
        .expect("object");

        assert!(spec.has("type"));
        assert_eq!(spec.get_str("type"), Some("regular_ll"));
        assert_eq!(spec.get_u64("ni"), Some(360));
        assert_eq!(spec.get_f64("ni"), Some(360.));
        assert_eq!(spec.get_f64("west_east_increment"), Some(1.));
        assert_eq!(spec.get_bool("periodic"), Some(true));
        assert_eq!(spec.get_i64s("pl"), Some(vec![20, 24, 24, 20]));
        assert_eq!(spec.get_str("missing"), None);
    }

    #[test]
    fn require_reports_the_key() {
        let spec = GridSpec::new();
        assert_matches!(spec.require_str("type"), Err(GridError::Spec(m)) if m.contains("type"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(GridSpec::from_value(json!([1, 2, 3])).is_err());
        assert!(GridSpec::from_value(json!("regular_ll")).is_err());
    }

    #[test]
    fn set_overwrites() {
        let mut spec = GridSpec::new();
        spec.set("type", "healpix").set("nside", 2);
        spec.set("nside", 4);
        assert_eq!(spec.get_u64("nside"), Some(4));
    }
}
