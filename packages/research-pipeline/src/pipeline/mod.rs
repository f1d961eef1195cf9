//! Result-processing pipeline.
//!
//! Raw hits for a topic flow through:
//! Date Gate -> within-run dedup -> cross-run filter -> Keyword Gate -> Ranker.
//! Topics share nothing but the read-only [`CrossRunMemory`].

pub mod collect;
pub mod rank;

pub use collect::collect_topic_hits;
pub use rank::{accept, sort_by_relevance, sort_by_year, Ranker, ScoredHit, RELEVANCE_THRESHOLD};

use std::sync::Arc;

use futures::future::join_all;

use crate::filters::{deduplicate, filter_by_date, filter_by_keywords, filter_seen, CrossRunMemory};
use crate::traits::{
    scorer::RelevanceScorer,
    searcher::{SearchOptions, WebSearcher},
};
use crate::types::{config::RunConfig, hit::SearchHit, report::ResearchReport, topic::Topic};

/// Hit counts after each stage, for logging and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub raw: usize,
    pub after_date: usize,
    pub after_dedup: usize,
    pub after_cross_run: usize,
    pub after_keywords: usize,
    pub ranked: usize,
}

/// Result of processing one topic.
#[derive(Debug, Clone)]
pub struct TopicOutcome {
    /// Topic name.
    pub topic: String,

    /// Final ordered, bounded hits.
    pub hits: Vec<SearchHit>,

    /// Per-stage counts.
    pub counts: StageCounts,
}

/// Per-run pipeline: config, cross-run memory and ranker.
pub struct ResearchPipeline<S> {
    config: RunConfig,
    memory: Arc<CrossRunMemory>,
    ranker: Ranker<S>,
}

impl<S: RelevanceScorer> ResearchPipeline<S> {
    /// Create a pipeline. `memory` is built once by the caller and shared.
    pub fn new(config: RunConfig, memory: Arc<CrossRunMemory>, scorer: S) -> Self {
        let ranker = Ranker::from_config(scorer, &config);
        Self {
            config,
            memory,
            ranker,
        }
    }

    /// Get the config.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Get the cross-run memory.
    pub fn memory(&self) -> &CrossRunMemory {
        &self.memory
    }

    /// Get the ranker.
    pub fn ranker(&self) -> &Ranker<S> {
        &self.ranker
    }

    /// Filter and rank one topic's raw hits.
    ///
    /// AI scoring runs only if both `use_ai` and the config flag are set.
    pub async fn process_topic(
        &self,
        topic: &Topic,
        hits: Vec<SearchHit>,
        use_ai: bool,
    ) -> TopicOutcome {
        let mut counts = StageCounts {
            raw: hits.len(),
            ..Default::default()
        };
        tracing::info!(topic = %topic.name, count = counts.raw, "Starting with raw results");

        let hits = filter_by_date(hits, self.config.min_year);
        counts.after_date = hits.len();
        tracing::info!(topic = %topic.name, count = counts.after_date, "After date filter");

        let hits = deduplicate(hits);
        counts.after_dedup = hits.len();

        let hits = filter_seen(hits, &self.memory);
        counts.after_cross_run = hits.len();

        let hits = filter_by_keywords(hits, &self.config.required_keywords);
        counts.after_keywords = hits.len();
        tracing::info!(topic = %topic.name, count = counts.after_keywords, "After keyword filter");

        let use_ai = use_ai && self.config.use_ai_filtering;
        let hits = self.ranker.rank(hits, topic, use_ai).await;
        counts.ranked = hits.len();
        tracing::info!(topic = %topic.name, count = counts.ranked, "Final result count");

        TopicOutcome {
            topic: topic.name.clone(),
            hits,
            counts,
        }
    }

    /// Search and process one topic.
    pub async fn research_topic<W: WebSearcher + ?Sized>(
        &self,
        searcher: &W,
        topic: &Topic,
        use_ai: bool,
    ) -> TopicOutcome {
        let options = SearchOptions::from(&self.config);
        let hits =
            collect_topic_hits(searcher, topic, &options, self.config.search_timeout).await;
        self.process_topic(topic, hits, use_ai).await
    }

    /// Research every configured topic concurrently.
    ///
    /// The report lists topics in configuration order.
    pub async fn run<W: WebSearcher + ?Sized>(&self, searcher: &W, use_ai: bool) -> ResearchReport {
        let outcomes = join_all(
            self.config
                .topics
                .iter()
                .map(|topic| self.research_topic(searcher, topic, use_ai)),
        )
        .await;

        let mut report = ResearchReport::new();
        for outcome in outcomes {
            tracing::info!(topic = %outcome.topic, counts = ?outcome.counts, "Topic complete");
            report.insert(outcome.topic, outcome.hits);
        }
        report
    }
}
