//! Fun-answer label → weighted restaurant tags

use crate::core::string::normalize_tag;
use crate::restaurant::Restaurant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTag {
    pub tag: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl WeightedTag {
    pub fn new(tag: impl AsRef<str>, weight: f64) -> Self {
        Self {
            tag: normalize_tag(tag.as_ref()),
            weight,
        }
    }
}

/// Static lookup table from fun-answer labels to restaurant tags
///
/// Labels and tags are compared in normalized form. A label with no entry
/// stands for itself: it matches a restaurant carrying a tag of the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "HashMap<String, Vec<WeightedTag>>",
    into = "HashMap<String, Vec<WeightedTag>>"
)]
pub struct TagMapping {
    entries: HashMap<String, Vec<WeightedTag>>,
}

impl From<HashMap<String, Vec<WeightedTag>>> for TagMapping {
    fn from(raw: HashMap<String, Vec<WeightedTag>>) -> Self {
        let mut mapping = TagMapping::new();
        for (label, tags) in raw {
            mapping.insert(&label, tags);
        }
        mapping
    }
}

impl From<TagMapping> for HashMap<String, Vec<WeightedTag>> {
    fn from(mapping: TagMapping) -> Self {
        mapping.entries
    }
}

impl TagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, label: &str, tags: I)
    where
        I: IntoIterator<Item = WeightedTag>,
    {
        let tags = tags
            .into_iter()
            .map(|t| WeightedTag::new(&t.tag, t.weight))
            .filter(|t| !t.tag.is_empty() && t.weight > 0.0 && t.weight.is_finite())
            .collect();
        self.entries.insert(normalize_tag(label), tags);
    }

    pub fn with<I>(mut self, label: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = WeightedTag>,
    {
        self.insert(label, tags);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags_for(&self, label: &str) -> Option<&[WeightedTag]> {
        self.entries.get(&normalize_tag(label)).map(Vec::as_slice)
    }

    /// Fraction of `label`'s tag weight present on `restaurant`, in `0.0..=1.0`
    pub fn match_fraction(&self, label: &str, restaurant: &Restaurant) -> f64 {
        let Some(tags) = self.tags_for(label) else {
            return if restaurant.has_tag(label) { 1.0 } else { 0.0 };
        };

        let total: f64 = tags.iter().map(|t| t.weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let matched: f64 = tags
            .iter()
            .filter(|t| restaurant.has_tag(&t.tag))
            .map(|t| t.weight)
            .sum();
        (matched / total).clamp(0.0, 1.0)
    }
}
