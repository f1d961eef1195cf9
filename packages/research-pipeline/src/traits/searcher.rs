//! Web searcher trait.
//!
//! Abstracts over search providers (Tavily, SerpAPI, etc.). The pipeline
//! performs no retry or pagination; a failed query simply contributes no
//! hits (see [`collect_topic_hits`](crate::pipeline::collect::collect_topic_hits)).

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::{config::RunConfig, hit::SearchHit};

/// Provider-facing options for a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum hits to return.
    pub max_results: usize,

    /// Provider search depth ("basic" or "advanced").
    pub search_depth: String,

    /// Only search these domains (empty = all).
    pub include_domains: Vec<String>,

    /// Never return these domains.
    pub exclude_domains: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            search_depth: "basic".to_string(),
            include_domains: vec![],
            exclude_domains: vec![],
        }
    }
}

impl From<&RunConfig> for SearchOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            max_results: config.max_results_per_query,
            search_depth: config.search_depth.clone(),
            include_domains: config.include_domains.clone(),
            exclude_domains: config.exclude_domains.clone(),
        }
    }
}

/// Web search for topic queries.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run one literal query and return its hits in provider order.
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError>;
}
