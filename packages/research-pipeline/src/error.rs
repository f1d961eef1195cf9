//! Typed errors for the research pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by pipeline operations.
///
/// Only configuration and I/O errors are fatal to a run. Search and scoring
/// errors are recovered inside the pipeline and only appear here when a
/// collaborator is called directly.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration is missing or invalid
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Search collaborator failed
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Relevance scorer failed
    #[error("scoring error: {0}")]
    Scoring(#[from] ScoreError),

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization or parsing error
    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Errors raised while loading or validating run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for any supported schema
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Neither `topics` nor `topic_clusters` present
    #[error("no 'topics' or 'topic_clusters' found in config")]
    NoTopics,

    /// Top-N must be positive
    #[error("top-N per topic must be greater than zero")]
    InvalidTopN,

    /// Two topics share a name
    #[error("duplicate topic name: {0}")]
    DuplicateTopic(String),

    /// Minimum year is not a 4-digit year
    #[error("invalid minimum year: {0}")]
    InvalidMinYear(String),

    /// Required credential not set
    #[error("missing required credential: {0}")]
    MissingCredential(String),
}

/// Errors from a search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider returned a non-success status
    #[error("search API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Call did not finish in time
    #[error("search timed out: {query}")]
    Timeout { query: String },
}

/// Errors from a relevance scorer.
///
/// The ranker funnels every variant into the same fail-open result.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// HTTP transport failed
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider returned an error response
    #[error("scorer API error: {0}")]
    Api(String),

    /// Call did not finish in time
    #[error("scoring timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Response could not be parsed into a score
    #[error("malformed scorer response: {0}")]
    MalformedResponse(String),

    /// Score outside `[0.0, 1.0]`
    #[error("relevance score out of range: {0}")]
    ScoreOutOfRange(f64),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
