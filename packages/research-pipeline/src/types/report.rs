//! Final per-topic output of a run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::hit::SearchHit;

/// Topic name to ordered, bounded hit list, in configuration order.
///
/// This is the only shape output writers consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchReport {
    topics: IndexMap<String, Vec<SearchHit>>,
}

impl ResearchReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hits for a topic, replacing any earlier entry.
    pub fn insert(&mut self, topic: impl Into<String>, hits: Vec<SearchHit>) {
        self.topics.insert(topic.into(), hits);
    }

    /// Hits for a topic.
    pub fn get(&self, topic: &str) -> Option<&[SearchHit]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    /// Iterate topics in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SearchHit])> {
        self.topics.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the report has no topics.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Total hits across all topics.
    pub fn total_hits(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }
}
