//! Relevance scorer trait.
//!
//! The ranker asks a scorer how relevant each hit is to its topic. Any
//! scoring backend (an LLM, a cross-encoder, a fixed table in tests) can sit
//! behind this trait. Every failure mode, including timeouts imposed by the
//! ranker, collapses into [`ScoreResult::fail_open`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::{hit::SearchHit, topic::Topic};

/// Reasoning attached to the fail-open result.
pub const UNAVAILABLE_REASONING: &str = "unavailable";

/// Structured relevance judgment for one hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Relevance in `[0.0, 1.0]`.
    pub relevance_score: f64,

    /// Scorer's own yes/no verdict.
    pub is_relevant: bool,

    /// Short explanation from the scorer.
    pub reasoning: String,
}

impl ScoreResult {
    /// Create a score result.
    pub fn new(relevance_score: f64, is_relevant: bool, reasoning: impl Into<String>) -> Self {
        Self {
            relevance_score,
            is_relevant,
            reasoning: reasoning.into(),
        }
    }

    /// Neutral result used whenever the scorer fails.
    ///
    /// The score is below the acceptance threshold: the hit stays in the
    /// scored candidate set but is rejected by the threshold step.
    pub fn fail_open() -> Self {
        Self::new(0.5, true, UNAVAILABLE_REASONING)
    }
}

/// Scores a hit against a topic.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Judge how relevant `hit` is to `topic`.
    async fn score(&self, hit: &SearchHit, topic: &Topic) -> Result<ScoreResult, ScoreError>;
}

#[async_trait]
impl<T: RelevanceScorer + ?Sized> RelevanceScorer for std::sync::Arc<T> {
    async fn score(&self, hit: &SearchHit, topic: &Topic) -> Result<ScoreResult, ScoreError> {
        (**self).score(hit, topic).await
    }
}

#[async_trait]
impl<T: RelevanceScorer + ?Sized> RelevanceScorer for Box<T> {
    async fn score(&self, hit: &SearchHit, topic: &Topic) -> Result<ScoreResult, ScoreError> {
        (**self).score(hit, topic).await
    }
}

/// Stand-in scorer for runs with AI filtering off.
///
/// Every call errors, so a misrouted call still fails open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScorer;

#[async_trait]
impl RelevanceScorer for DisabledScorer {
    async fn score(&self, _hit: &SearchHit, _topic: &Topic) -> Result<ScoreResult, ScoreError> {
        Err(ScoreError::Api("AI scoring disabled".into()))
    }
}
