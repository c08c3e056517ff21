//! Per-answer selection counts

use crate::questionnaire::AnswerKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many members picked each answer, plus majority boosts
///
/// Produced by [`ConsensusAggregator`](super::ConsensusAggregator) and read by
/// the scorer's group-consensus bonus. Boosted entries may exceed
/// `member_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCounts {
    #[serde(with = "entries")]
    counts: BTreeMap<AnswerKey, u32>,
    member_count: usize,
}

impl SelectionCounts {
    pub fn new(member_count: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            member_count,
        }
    }

    pub fn member_count(&self) -> usize {
        self.member_count
    }

    pub fn add(&mut self, key: AnswerKey, amount: u32) {
        *self.counts.entry(key).or_insert(0) += amount;
    }

    pub fn get(&self, key: &AnswerKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Share of members behind `key`; boosted entries can exceed 1.0
    pub fn proportion(&self, key: &AnswerKey) -> f64 {
        if self.member_count == 0 {
            return 0.0;
        }
        f64::from(self.get(key)) / self.member_count as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &u32)> {
        self.counts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Serialize the map as a list of `{key, count}` records, since the keys are
/// structured and JSON object keys must be strings.
mod entries {
    use crate::questionnaire::AnswerKey;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        key: AnswerKey,
        count: u32,
    }

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<AnswerKey, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = map
            .iter()
            .map(|(key, count)| Entry {
                key: key.clone(),
                count: *count,
            })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<AnswerKey, u32>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| (e.key, e.count)).collect())
    }
}
