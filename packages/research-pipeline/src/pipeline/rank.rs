//! Relevance ranking.
//!
//! Each hit moves `Unscored -> Scored -> Accepted | Rejected`; accepted hits
//! are then sorted by score and truncated to top-N. With AI scoring off,
//! hits are sorted by publication year instead and never scored.

use std::cmp::Ordering;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::traits::scorer::{RelevanceScorer, ScoreResult};
use crate::types::{config::RunConfig, hit::SearchHit, topic::Topic};

/// Minimum relevance score for a hit to be reported.
pub const RELEVANCE_THRESHOLD: f64 = 0.6;

/// A hit paired with its scorer verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    /// The hit, with `relevance_score` already assigned.
    pub hit: SearchHit,

    /// Full scorer result (fail-open if the scorer failed).
    pub score: ScoreResult,
}

impl ScoredHit {
    /// Whether the score meets [`RELEVANCE_THRESHOLD`].
    pub fn is_accepted(&self) -> bool {
        self.score.relevance_score >= RELEVANCE_THRESHOLD
    }
}

/// Scores, gates, sorts and truncates one topic's hits.
pub struct Ranker<S> {
    scorer: S,
    top_n: usize,
    concurrency: usize,
    timeout: Duration,
}

impl<S: RelevanceScorer> Ranker<S> {
    /// Create a ranker with default limits (top 15, 4 concurrent calls, 30 s timeout).
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            top_n: 15,
            concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a ranker using the limits from a run config.
    pub fn from_config(scorer: S, config: &RunConfig) -> Self {
        Self::new(scorer)
            .with_top_n(config.top_n)
            .with_concurrency(config.scoring_concurrency)
            .with_timeout(config.scorer_timeout)
    }

    /// Set top-N.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the maximum number of in-flight scorer calls.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-call scorer timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Rank hits for a topic.
    ///
    /// With `use_ai` the hits are scored, gated on [`RELEVANCE_THRESHOLD`] and
    /// sorted by score; otherwise they are sorted by year. Either way at most
    /// top-N hits are returned.
    pub async fn rank(&self, hits: Vec<SearchHit>, topic: &Topic, use_ai: bool) -> Vec<SearchHit> {
        let mut ranked = if use_ai && !hits.is_empty() {
            tracing::info!(topic = %topic.name, count = hits.len(), "Analyzing results with AI");
            let scored = self.score_all(hits, topic).await;
            let mut accepted = accept(scored);
            tracing::info!(topic = %topic.name, accepted = accepted.len(), "After AI filtering");
            sort_by_relevance(&mut accepted);
            accepted
        } else {
            let mut hits = hits;
            sort_by_year(&mut hits);
            hits
        };

        ranked.truncate(self.top_n);
        ranked
    }

    /// Score every hit, in input order.
    ///
    /// Scorer errors, timeouts and out-of-range scores all yield
    /// [`ScoreResult::fail_open`]; no hit is ever dropped here.
    pub async fn score_all(&self, hits: Vec<SearchHit>, topic: &Topic) -> Vec<ScoredHit> {
        let scorer = &self.scorer;
        let timeout = self.timeout;

        stream::iter(hits.into_iter().map(|mut hit| async move {
            let score = match tokio::time::timeout(timeout, scorer.score(&hit, topic)).await {
                Ok(Ok(result)) if (0.0..=1.0).contains(&result.relevance_score) => result,
                Ok(Ok(result)) => {
                    tracing::warn!(
                        url = %hit.url,
                        score = result.relevance_score,
                        "AI score out of range, using fallback"
                    );
                    ScoreResult::fail_open()
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %hit.url, error = %e, "AI analysis failed, using fallback");
                    ScoreResult::fail_open()
                }
                Err(_) => {
                    tracing::warn!(url = %hit.url, ?timeout, "AI analysis timed out, using fallback");
                    ScoreResult::fail_open()
                }
            };

            hit.relevance_score = score.relevance_score;
            ScoredHit { hit, score }
        }))
        .buffered(self.concurrency)
        .collect()
        .await
    }
}

/// Keep accepted hits, in order.
pub fn accept(scored: Vec<ScoredHit>) -> Vec<SearchHit> {
    scored
        .into_iter()
        .filter_map(|s| {
            if s.is_accepted() {
                Some(s.hit)
            } else {
                tracing::debug!(url = %s.hit.url, score = s.score.relevance_score, "Rejected by relevance");
                None
            }
        })
        .collect()
}

/// Stable sort by relevance score, highest first.
pub fn sort_by_relevance(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Stable sort by publication year, newest first. Hits without a usable year go last.
pub fn sort_by_year(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| b.year().cmp(&a.year()));
}
