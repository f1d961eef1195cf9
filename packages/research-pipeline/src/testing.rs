//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the pipeline
//! without making real AI or network calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use crate::error::{ScoreError, SearchError};
use crate::traits::{
    scorer::{RelevanceScorer, ScoreResult},
    searcher::{SearchOptions, WebSearcher},
};
use crate::types::{hit::SearchHit, topic::Topic};

/// A mock scorer with per-URL scores.
///
/// URLs without a configured score use the default score if one is set,
/// otherwise the call fails.
#[derive(Default)]
pub struct MockScorer {
    scores: HashMap<String, f64>,
    default_score: Option<f64>,
    calls: RwLock<Vec<String>>,
}

impl MockScorer {
    /// Create a mock scorer with no scores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `url` with `score`.
    pub fn with_score(mut self, url: impl Into<String>, score: f64) -> Self {
        self.scores.insert(url.into(), score);
        self
    }

    /// Score every unknown URL with `score`.
    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = Some(score);
        self
    }

    /// URLs scored so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of score calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl RelevanceScorer for MockScorer {
    async fn score(&self, hit: &SearchHit, _topic: &Topic) -> Result<ScoreResult, ScoreError> {
        self.calls.write().unwrap().push(hit.url.clone());

        let score = self
            .scores
            .get(&hit.url)
            .copied()
            .or(self.default_score)
            .ok_or_else(|| ScoreError::MalformedResponse(format!("no mock score for {}", hit.url)))?;

        Ok(ScoreResult::new(score, score >= 0.6, "mock"))
    }
}

/// A scorer whose every call fails.
pub struct FailingScorer;

#[async_trait]
impl RelevanceScorer for FailingScorer {
    async fn score(&self, _hit: &SearchHit, _topic: &Topic) -> Result<ScoreResult, ScoreError> {
        Err(ScoreError::Api("scorer unavailable".into()))
    }
}

/// A scorer that sleeps before answering. Pair with a short ranker timeout.
pub struct SlowScorer {
    delay: Duration,
    score: f64,
}

impl SlowScorer {
    /// Answer `score` after `delay`.
    pub fn new(delay: Duration, score: f64) -> Self {
        Self { delay, score }
    }
}

#[async_trait]
impl RelevanceScorer for SlowScorer {
    async fn score(&self, _hit: &SearchHit, _topic: &Topic) -> Result<ScoreResult, ScoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(ScoreResult::new(self.score, true, "slow"))
    }
}

/// Mock web searcher returning canned hits per query.
#[derive(Default)]
pub struct MockSearcher {
    results: HashMap<String, Vec<SearchHit>>,
    failing: HashSet<String>,
    queries: RwLock<Vec<String>>,
}

impl MockSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `hits` for `query`.
    pub fn with_results(mut self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.results.insert(query.into(), hits);
        self
    }

    /// Fail every call for `query`.
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Queries executed so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.write().unwrap().push(query.to_string());

        if self.failing.contains(query) {
            return Err(SearchError::Api {
                status: 503,
                body: "mock failure".into(),
            });
        }

        let mut hits = self.results.get(query).cloned().unwrap_or_default();
        hits.truncate(options.max_results);
        Ok(hits)
    }
}
