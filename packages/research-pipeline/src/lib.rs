//! Topic Research Pipeline
//!
//! Turns a noisy, multi-query stream of web search hits into a bounded,
//! ordered, deduplicated list per research topic.
//!
//! # Pipeline
//!
//! For each topic, raw hits pass through:
//!
//! 1. **Date gate** - drop hits published before the minimum year
//! 2. **Deduplicator** - drop repeated URLs and near-identical titles
//! 3. **Cross-run filter** - drop URLs reported by earlier runs
//! 4. **Keyword gate** - require at least one configured keyword
//! 5. **Ranker** - AI relevance scoring, threshold, sort, top-N
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use research_pipeline::{CrossRunMemory, ResearchPipeline, RunConfig, TavilySearcher};
//! use research_pipeline::ai::OpenAIScorer;
//!
//! let config = RunConfig::from_file("config.yaml")?;
//! let memory = Arc::new(CrossRunMemory::load(&config.output_dir));
//! let scorer = OpenAIScorer::from_config(openai_key, &config);
//! let searcher = TavilySearcher::new(tavily_key)?;
//!
//! let pipeline = ResearchPipeline::new(config, memory, scorer);
//! let report = pipeline.run(&searcher, true).await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Hits, topics, run configuration, reports
//! - [`traits`] - Collaborator seams (`WebSearcher`, `RelevanceScorer`)
//! - [`filters`] - Gates and cross-run memory
//! - [`pipeline`] - Ranking and per-topic orchestration
//! - [`search`] - Tavily search client
//! - [`ai`] - OpenAI relevance scorer
//! - [`output`] - JSON research-data writer
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, PipelineError, Result, ScoreError, SearchError};
pub use filters::{
    deduplicate, filter_by_date, filter_by_keywords, filter_seen, title_fingerprint,
    CrossRunMemory,
};
pub use output::{prune_old_outputs, write_research_data, ResearchData};
pub use pipeline::{
    collect_topic_hits, Ranker, ResearchPipeline, ScoredHit, StageCounts, TopicOutcome,
    RELEVANCE_THRESHOLD,
};
pub use search::TavilySearcher;
pub use security::{ApiCredentials, SecretString};
pub use traits::{
    scorer::{DisabledScorer, RelevanceScorer, ScoreResult},
    searcher::{SearchOptions, WebSearcher},
};
pub use types::{
    config::{ConfigFile, RunConfig},
    hit::SearchHit,
    report::ResearchReport,
    topic::Topic,
};

// Re-export testing utilities
pub use testing::{FailingScorer, MockScorer, MockSearcher, SlowScorer};
