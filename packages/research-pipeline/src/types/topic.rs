//! Research topic type.

use serde::{Deserialize, Serialize};

/// A named research interest.
///
/// Built once from configuration at run start and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique name within a run.
    pub name: String,

    /// Keywords describing the topic. Order is irrelevant for matching.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Literal query strings to execute, in order.
    #[serde(default)]
    pub search_variations: Vec<String>,
}

impl Topic {
    /// Create a topic with no keywords or queries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            search_variations: Vec::new(),
        }
    }

    /// Set the keywords.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Set the search queries.
    pub fn with_queries(mut self, queries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.search_variations = queries.into_iter().map(|q| q.into()).collect();
        self
    }
}
