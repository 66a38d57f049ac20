//! Per-node feature vectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A feature vector: feature name to value.
///
/// A missing key means the feature is unset, which is distinct from a
/// value of zero.
///
/// # Examples
///
/// ```
/// use smallworlds::Context;
///
/// let ctx: Context = [("rain", 0.1), ("sunny", 0.9)].into_iter().collect();
/// assert_eq!(ctx.get("sunny"), Some(0.9));
/// assert_eq!(ctx.get("snow"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(BTreeMap<String, f64>);

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no feature is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Value of a feature, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Returns true if the feature is set.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a feature, returning its previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Merges `other` into `self`; values from `other` win.
    pub fn right_join(&mut self, other: &Self) -> &mut Self {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), *v);
        }
        self
    }

    /// Merges only the features of `other` that `self` lacks; existing
    /// values win.
    pub fn left_join(&mut self, other: &Self) -> &mut Self {
        for (k, v) in &other.0 {
            self.0.entry(k.clone()).or_insert(*v);
        }
        self
    }

    /// Iterates features in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, f64)]) -> Context {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_empty_context() {
        let c = Context::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert_eq!(c.keys().count(), 0);
    }

    #[test]
    fn test_unset_is_not_zero() {
        let c = ctx(&[("zero", 0.0)]);
        assert_eq!(c.get("zero"), Some(0.0));
        assert_eq!(c.get("missing"), None);
        assert!(c.contains_key("zero"));
        assert!(!c.contains_key("missing"));
    }

    #[test]
    fn test_right_join_overwrites() {
        let mut c = ctx(&[("a", 1.0), ("b", 2.0)]);
        c.right_join(&ctx(&[("b", 20.0), ("c", 30.0)]));
        assert_eq!(c, ctx(&[("a", 1.0), ("b", 20.0), ("c", 30.0)]));
    }

    #[test]
    fn test_left_join_keeps_existing() {
        let mut c = ctx(&[("a", 1.0), ("b", 2.0)]);
        c.left_join(&ctx(&[("b", 20.0), ("c", 30.0)]));
        assert_eq!(c, ctx(&[("a", 1.0), ("b", 2.0), ("c", 30.0)]));
    }

    #[test]
    fn test_keys_sorted() {
        let c = ctx(&[("sunny", 0.9), ("rain", 0.1)]);
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["rain", "sunny"]);
        assert_eq!(c.iter().next(), Some(("rain", 0.1)));
    }

    #[test]
    fn test_serializes_as_map() {
        let c = ctx(&[("rain", 0.5)]);
        assert_eq!(serde_json::to_value(&c).unwrap(), serde_json::json!({"rain": 0.5}));
    }
}
