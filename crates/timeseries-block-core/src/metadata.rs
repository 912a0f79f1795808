//! Block-level and per-series metadata.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// An ordered set of `name=value` labels identifying a series.
///
/// JSON layout example: `{"host": "a", "region": "us-east"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// An empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a tag, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a tag, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Value of tag `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Tags present with the same value in both sets.
    pub fn intersect(&self, other: &Tags) -> Tags {
        self.0
            .iter()
            .filter(|(k, v)| other.0.get(*k) == Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v:?}")?;
        }
        f.write_str("}")
    }
}

/// Metadata shared by every series in a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Time window and step of the block.
    pub bounds: Bounds,
    /// Tags common to every series in the block.
    pub tags: Tags,
}

impl Metadata {
    /// Metadata with the given bounds and no common tags.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            tags: Tags::new(),
        }
    }

    /// Replace the common tags.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }
}

/// Metadata for one series of a block.
///
/// A block's series metadata is positionally aligned with both iteration
/// orders: entry `i` describes the series at position `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesMeta {
    /// Tags of the series.
    pub tags: Tags,
}

impl SeriesMeta {
    /// Series metadata carrying `tags`.
    pub fn new(tags: Tags) -> Self {
        Self { tags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_keeps_only_matching_pairs() {
        let a = Tags::new()
            .with("__name__", "cpu")
            .with("host", "a")
            .with("dc", "east");
        let b = Tags::new()
            .with("__name__", "cpu")
            .with("host", "b")
            .with("dc", "east");

        let common = a.intersect(&b);
        assert_eq!(common.len(), 2);
        assert_eq!(common.get("__name__"), Some("cpu"));
        assert_eq!(common.get("dc"), Some("east"));
        assert_eq!(common.get("host"), None);
    }

    #[test]
    fn display_is_sorted_by_name() {
        let tags: Tags = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(tags.to_string(), r#"{a="2",z="1"}"#);
        assert_eq!(Tags::new().to_string(), "{}");
    }

    #[test]
    fn serializes_as_plain_object() {
        let tags = Tags::new().with("host", "a");
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"{"host":"a"}"#);

        let back: Tags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }
}
