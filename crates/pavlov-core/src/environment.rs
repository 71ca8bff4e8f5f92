//! Environment state and its canonical schema

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{PavlovError, Result};

/// Upper bound for every environment variable
pub const MAX_VARIABLE: f64 = 1.0;

/// Situational context of an agent: named scalar variables
///
/// Variables are kept sorted by name, so iteration order is always the
/// lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentState {
    variables: BTreeMap<String, f64>,
}

impl EnvironmentState {
    /// Create an empty environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a variable
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.variables.get(key).copied()
    }

    /// Value of a variable, `0.0` when absent
    #[must_use]
    pub fn value(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    /// Set a variable, returning its previous value
    pub fn set(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.variables.insert(key.into(), value)
    }

    /// Check if a variable is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Variable names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Mutable access to every value, in sorted order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.variables.values_mut()
    }

    /// Number of variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if there are no variables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EnvironmentState {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for EnvironmentState {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Fail if any variable exceeds [`MAX_VARIABLE`]
///
/// There is no lower bound. NaN is rejected.
pub fn validate_bounds(environment: &EnvironmentState) -> Result<()> {
    for (key, value) in environment.iter() {
        if value.is_nan() || value > MAX_VARIABLE {
            return Err(PavlovError::EnvironmentRange {
                key: key.to_string(),
                value,
            });
        }
    }
    Ok(())
}

/// Canonical, immutable key order established from the starting environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSchema {
    keys: Vec<String>,
}

impl EnvironmentSchema {
    /// Capture the key set of a starting environment
    #[must_use]
    pub fn from_environment(environment: &EnvironmentState) -> Self {
        Self {
            keys: environment.keys().map(str::to_string).collect(),
        }
    }

    /// Canonical keys, sorted
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of canonical keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the schema has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check if an environment has exactly the canonical key set
    #[must_use]
    pub fn matches(&self, environment: &EnvironmentState) -> bool {
        environment.len() == self.keys.len()
            && environment.keys().zip(&self.keys).all(|(a, b)| a == b)
    }

    /// Ordered copy of `raw`, or a schema error if its keys differ
    pub fn normalize(&self, raw: &EnvironmentState) -> Result<EnvironmentState> {
        if !self.matches(raw) {
            return Err(PavlovError::EnvironmentSchema {
                expected: self.keys.clone(),
                actual: raw.keys().map(str::to_string).collect(),
            });
        }
        Ok(raw.clone())
    }

    /// Normalize, bound-check and flatten into canonical order
    pub fn values(&self, environment: &EnvironmentState) -> Result<Vec<f64>> {
        let normalized = self.normalize(environment)?;
        validate_bounds(&normalized)?;
        Ok(normalized.iter().map(|(_, v)| v).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn schema() -> EnvironmentSchema {
        EnvironmentSchema::from_environment(&EnvironmentState::from([("z", 0.9), ("a", 0.1)]))
    }

    #[test]
    fn test_keys_sorted() {
        assert_eq!(schema().keys(), ["a".to_string(), "z".to_string()]);
        assert!(EnvironmentSchema::default().is_empty());
    }

    #[test]
    fn test_values_in_canonical_order() {
        let values = schema()
            .values(&EnvironmentState::from([("z", 0.8), ("a", 0.2)]))
            .unwrap();
        assert_eq!(values, vec![0.2, 0.8]);
    }

    #[test]
    fn test_schema_mismatch() {
        let err = schema()
            .normalize(&EnvironmentState::from([("c", 1.0)]))
            .unwrap_err();
        match err {
            PavlovError::EnvironmentSchema { expected, actual } => {
                assert_eq!(expected, vec!["a", "z"]);
                assert_eq!(actual, vec!["c"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let superset = EnvironmentState::from([("a", 0.1), ("b", 0.1), ("z", 0.1)]);
        assert!(schema().normalize(&superset).is_err());
    }

    #[test]
    fn test_out_of_range() {
        let err = schema()
            .values(&EnvironmentState::from([("a", 0.1), ("z", 1.2)]))
            .unwrap_err();
        match err {
            PavlovError::EnvironmentRange { key, value } => {
                assert_eq!(key, "z");
                assert_eq!(value, 1.2);
            }
            other => panic!("unexpected error: {other}"),
        }

        // no lower bound
        assert!(validate_bounds(&EnvironmentState::from([("a", -4.0)])).is_ok());
        assert!(validate_bounds(&EnvironmentState::from([("a", f64::NAN)])).is_err());
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(a in -2.0f64..1.0, z in -2.0f64..1.0) {
            let schema = schema();
            let env = EnvironmentState::from([("z", z), ("a", a)]);
            let once = schema.normalize(&env).unwrap();
            let twice = schema.normalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn bounds_and_normalize_commute(a in -2.0f64..2.0, z in -2.0f64..2.0) {
            let schema = schema();
            let env = EnvironmentState::from([("a", a), ("z", z)]);

            let bounds_first = validate_bounds(&env)
                .and_then(|()| schema.normalize(&env))
                .ok();
            let normalize_first = schema
                .normalize(&env)
                .and_then(|n| validate_bounds(&n).map(|()| n))
                .ok();
            prop_assert_eq!(bounds_first, normalize_first);
        }
    }
}
