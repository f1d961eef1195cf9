//! Run configuration and the tolerant config-file parser.
//!
//! Config files come in several schema generations (flat `topics` vs.
//! `topic_clusters`, flat vs. tiered domain lists, `min_year` vs.
//! `date_range`). [`ConfigFile`] accepts all of them and
//! [`ConfigFile::into_run_config`] normalizes into one canonical
//! [`RunConfig`]. The pipeline only ever sees `RunConfig`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::pipeline::rank::RELEVANCE_THRESHOLD;
use crate::types::topic::Topic;

/// Validated run-wide parameters.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Topics to research, in configuration order.
    pub topics: Vec<Topic>,

    /// Search depth passed to the provider ("basic" or "advanced").
    pub search_depth: String,

    /// Maximum hits requested per query.
    pub max_results_per_query: usize,

    /// Hits published before this year are dropped.
    pub min_year: i32,

    /// Maximum hits reported per topic. Always > 0.
    pub top_n: usize,

    /// Directory holding persisted research output.
    pub output_dir: PathBuf,

    /// Days to keep old output files (0 keeps them forever).
    pub retention_days: u32,

    /// Domains the search provider should prefer.
    pub include_domains: Vec<String>,

    /// Domains the search provider should skip.
    pub exclude_domains: Vec<String>,

    /// At least one of these must appear in title or snippet (empty = no gate).
    pub required_keywords: Vec<String>,

    /// Chat model used for relevance scoring.
    pub ai_model: String,

    /// Sampling temperature for the scorer.
    pub ai_temperature: f32,

    /// Score hits with the AI scorer. When false, hits are ranked by year.
    pub use_ai_filtering: bool,

    /// Maximum in-flight scorer calls per topic.
    pub scoring_concurrency: usize,

    /// Per-call timeout for the scorer.
    pub scorer_timeout: Duration,

    /// Per-call timeout for the search provider.
    pub search_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            topics: vec![],
            search_depth: "basic".to_string(),
            max_results_per_query: 10,
            min_year: 2024,
            top_n: 15,
            output_dir: PathBuf::from("outputs"),
            retention_days: 30,
            include_domains: vec![],
            exclude_domains: vec![],
            required_keywords: vec![],
            ai_model: "gpt-4o-mini".to_string(),
            ai_temperature: 0.3,
            use_ai_filtering: true,
            scoring_concurrency: 4,
            scorer_timeout: Duration::from_secs(30),
            search_timeout: Duration::from_secs(30),
        }
    }
}

impl RunConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load, normalize and validate a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading configuration");

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse, normalize and validate YAML config text.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        let config = file.into_run_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Check run-wide invariants.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.topics.is_empty() {
            return Err(ConfigError::NoTopics);
        }
        let mut names = HashSet::new();
        if let Some(topic) = self.topics.iter().find(|t| !names.insert(t.name.as_str())) {
            return Err(ConfigError::DuplicateTopic(topic.name.clone()));
        }
        if self.top_n == 0 {
            return Err(ConfigError::InvalidTopN);
        }
        if !(1000..=9999).contains(&self.min_year) {
            return Err(ConfigError::InvalidMinYear(self.min_year.to_string()));
        }
        Ok(())
    }

    /// Minimum relevance score a hit needs to be reported in AI mode.
    pub fn relevance_threshold(&self) -> f64 {
        RELEVANCE_THRESHOLD
    }

    /// Set topics.
    pub fn with_topics(mut self, topics: impl IntoIterator<Item = Topic>) -> Self {
        self.topics = topics.into_iter().collect();
        self
    }

    /// Set the minimum publication year.
    pub fn with_min_year(mut self, year: i32) -> Self {
        self.min_year = year;
        self
    }

    /// Set top-N per topic.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set required keywords.
    pub fn with_required_keywords(
        mut self,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.required_keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Enable or disable AI scoring.
    pub fn with_ai_filtering(mut self, enabled: bool) -> Self {
        self.use_ai_filtering = enabled;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the output retention window in days (0 disables pruning).
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Maximum age of output files, or `None` if pruning is disabled.
    pub fn retention(&self) -> Option<Duration> {
        (self.retention_days > 0)
            .then(|| Duration::from_secs(u64::from(self.retention_days) * 24 * 60 * 60))
    }

    /// Set scorer concurrency (clamped to at least 1).
    pub fn with_scoring_concurrency(mut self, n: usize) -> Self {
        self.scoring_concurrency = n.max(1);
        self
    }

    /// Set the scorer timeout.
    pub fn with_scorer_timeout(mut self, timeout: Duration) -> Self {
        self.scorer_timeout = timeout;
        self
    }
}

// ============================================================================
// Raw config file schema
// ============================================================================

/// Permissive shape of a config file, covering every supported schema.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    topic_clusters: Option<Vec<RawCluster>>,
    topics: Option<Vec<RawTopic>>,
    tavily: RawTavily,
    domains: Option<RawDomains>,
    filtering: RawFiltering,
    output: Option<serde_yaml::Value>,
    ai: RawAi,
    pipeline: RawPipeline,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCluster {
    cluster_name: Option<String>,
    name: Option<String>,
    keywords: Vec<String>,
    search_queries: Option<Vec<String>>,
    search_variations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    search_variations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTavily {
    search_depth: Option<String>,
    max_results: Option<usize>,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDomains {
    tier1_priority: Option<Vec<String>>,
    tier2_include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

impl RawDomains {
    fn is_empty(&self) -> bool {
        self.tier1_priority.is_none() && self.tier2_include.is_none() && self.exclude.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFiltering {
    date_range: Option<RawDateRange>,
    min_year: Option<i32>,
    output_limits: Option<RawOutputLimits>,
    top_n_per_topic: Option<usize>,
    required_keywords: Option<Vec<String>>,
    content_requirements: Option<RawContentRequirements>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDateRange {
    min_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOutputLimits {
    top_n_per_cluster: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawContentRequirements {
    must_contain_one_of: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAi {
    primary_model: Option<String>,
    temperature: Option<f32>,
    use_ai_filtering: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPipeline {
    scoring_concurrency: Option<usize>,
    scorer_timeout_secs: Option<u64>,
    search_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Normalize whichever schema variant was supplied into a [`RunConfig`].
    ///
    /// Does not validate; call [`RunConfig::validate`] afterwards.
    pub fn into_run_config(self) -> ConfigResult<RunConfig> {
        let defaults = RunConfig::default();

        let topics = match (self.topic_clusters, self.topics) {
            (Some(clusters), _) => clusters
                .into_iter()
                .map(|c| Topic {
                    name: c
                        .cluster_name
                        .or(c.name)
                        .unwrap_or_else(|| "Unnamed".to_string()),
                    keywords: c.keywords,
                    search_variations: c
                        .search_queries
                        .or(c.search_variations)
                        .unwrap_or_default(),
                })
                .collect(),
            (None, Some(topics)) => topics
                .into_iter()
                .map(|t| Topic {
                    name: t.name,
                    keywords: t.keywords,
                    search_variations: t.search_variations,
                })
                .collect(),
            (None, None) => return Err(ConfigError::NoTopics),
        };

        let (include_domains, exclude_domains) = match self.domains {
            Some(d) if !d.is_empty() => {
                let mut include = d.tier1_priority.unwrap_or_default();
                include.extend(d.tier2_include.unwrap_or_default());
                (include, d.exclude.unwrap_or_default())
            }
            _ => (self.tavily.include_domains, self.tavily.exclude_domains),
        };

        let output_dir = self
            .output
            .as_ref()
            .and_then(|o| o.get("directory"))
            .and_then(|d| d.as_str())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let retention_days = self
            .output
            .as_ref()
            .and_then(|o| o.get("retention_days"))
            .and_then(|d| d.as_u64())
            .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
            .unwrap_or(defaults.retention_days);

        let filtering = self.filtering;
        let min_year = match filtering.date_range {
            Some(range) => {
                let min_date = range.min_date.unwrap_or_else(|| "2024-01-01".to_string());
                parse_year_prefix(&min_date)?
            }
            None => filtering.min_year.unwrap_or(defaults.min_year),
        };

        let top_n = match filtering.output_limits {
            Some(limits) => limits.top_n_per_cluster.unwrap_or(10),
            None => filtering.top_n_per_topic.unwrap_or(defaults.top_n),
        };

        let required_keywords = filtering
            .required_keywords
            .or_else(|| {
                filtering
                    .content_requirements
                    .map(|c| c.must_contain_one_of)
            })
            .unwrap_or_default();

        let pipeline = self.pipeline;

        Ok(RunConfig {
            topics,
            search_depth: self.tavily.search_depth.unwrap_or(defaults.search_depth),
            max_results_per_query: self
                .tavily
                .max_results
                .unwrap_or(defaults.max_results_per_query),
            min_year,
            top_n,
            output_dir,
            retention_days,
            include_domains,
            exclude_domains,
            required_keywords,
            ai_model: self.ai.primary_model.unwrap_or(defaults.ai_model),
            ai_temperature: self.ai.temperature.unwrap_or(defaults.ai_temperature),
            use_ai_filtering: self.ai.use_ai_filtering.unwrap_or(defaults.use_ai_filtering),
            scoring_concurrency: pipeline
                .scoring_concurrency
                .unwrap_or(defaults.scoring_concurrency)
                .max(1),
            scorer_timeout: pipeline
                .scorer_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.scorer_timeout),
            search_timeout: pipeline
                .search_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.search_timeout),
        })
    }
}

/// Year from the first four characters of an ISO-style date.
fn parse_year_prefix(date: &str) -> ConfigResult<i32> {
    date.get(..4)
        .and_then(|y| y.parse().ok())
        .ok_or_else(|| ConfigError::InvalidMinYear(date.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_schema() {
        let yaml = r#"
topic_clusters:
  - cluster_name: "LLM agents"
    keywords: ["agent", "llm"]
    search_queries: ["llm agents engineering 2025"]
  - name: "Fallback name"
    search_variations: ["q1", "q2"]
  - keywords: ["x"]
filtering:
  date_range:
    min_date: "2025-03-01"
  output_limits:
    top_n_per_cluster: 7
  content_requirements:
    must_contain_one_of: ["engineering"]
domains:
  tier1_priority: ["arxiv.org"]
  tier2_include: ["ieee.org"]
  exclude: ["pinterest.com"]
output:
  directory: "reports"
ai:
  primary_model: "gpt-4o"
  temperature: 0.1
  use_ai_filtering: false
"#;

        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.topics.len(), 3);
        assert_eq!(config.topics[0].name, "LLM agents");
        assert_eq!(config.topics[0].search_variations, vec!["llm agents engineering 2025"]);
        assert_eq!(config.topics[1].name, "Fallback name");
        assert_eq!(config.topics[1].search_variations, vec!["q1", "q2"]);
        assert_eq!(config.topics[2].name, "Unnamed");
        assert!(config.topics[2].search_variations.is_empty());
        assert_eq!(config.min_year, 2025);
        assert_eq!(config.top_n, 7);
        assert_eq!(config.required_keywords, vec!["engineering"]);
        assert_eq!(config.include_domains, vec!["arxiv.org", "ieee.org"]);
        assert_eq!(config.exclude_domains, vec!["pinterest.com"]);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.ai_model, "gpt-4o");
        assert!(!config.use_ai_filtering);
    }

    #[test]
    fn test_flat_topics_schema() {
        let yaml = r#"
topics:
  - name: "RAG"
    keywords: ["retrieval"]
    search_variations: ["retrieval augmented generation"]
tavily:
  search_depth: advanced
  max_results: 5
  include_domains: ["arxiv.org"]
  exclude_domains: ["reddit.com"]
filtering:
  min_year: 2023
  top_n_per_topic: 20
  required_keywords: ["llm", "rag"]
"#;

        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.topics[0].name, "RAG");
        assert_eq!(config.search_depth, "advanced");
        assert_eq!(config.max_results_per_query, 5);
        assert_eq!(config.include_domains, vec!["arxiv.org"]);
        assert_eq!(config.exclude_domains, vec!["reddit.com"]);
        assert_eq!(config.min_year, 2023);
        assert_eq!(config.top_n, 20);
        assert_eq!(config.required_keywords, vec!["llm", "rag"]);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_yaml_str("topics:\n  - name: t\n").unwrap();
        assert_eq!(config.min_year, 2024);
        assert_eq!(config.top_n, 15);
        assert_eq!(config.search_depth, "basic");
        assert_eq!(config.max_results_per_query, 10);
        assert_eq!(config.ai_model, "gpt-4o-mini");
        assert!(config.use_ai_filtering);
        assert!(config.required_keywords.is_empty());
        assert_eq!(config.relevance_threshold(), 0.6);
    }

    #[test]
    fn test_cluster_defaults_for_limits() {
        let yaml = "topics:\n  - name: t\nfiltering:\n  date_range: {}\n  output_limits: {}\n";
        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.min_year, 2024);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_missing_topics_is_fatal() {
        let err = RunConfig::from_yaml_str("filtering:\n  min_year: 2024\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoTopics));

        let err = RunConfig::from_yaml_str("topics: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoTopics));
    }

    #[test]
    fn test_duplicate_topic_names_rejected() {
        let yaml = r#"
topic_clusters:
  - search_queries: ["q1"]
  - search_queries: ["q2"]
"#;
        let err = RunConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTopic(ref name) if name == "Unnamed"));

        let config = RunConfig::new().with_topics([Topic::new("rag"), Topic::new("rag")]);
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateTopic(_))));

        let config = RunConfig::new().with_topics([Topic::new("rag"), Topic::new("agents")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RunConfig::from_yaml_str(
            "topics:\n  - name: t\nfiltering:\n  top_n_per_topic: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTopN));

        let err = RunConfig::from_yaml_str(
            "topics:\n  - name: t\nfiltering:\n  date_range:\n    min_date: \"soon\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMinYear(_)));

        let err =
            RunConfig::from_yaml_str("topics:\n  - name: t\nfiltering:\n  min_year: 99\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMinYear(_)));
    }

    #[test]
    fn test_output_not_a_mapping_uses_default_dir() {
        let config = RunConfig::from_yaml_str("topics:\n  - name: t\noutput: markdown\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_retention_days() {
        let config = RunConfig::from_yaml_str("topics:\n  - name: t\n").unwrap();
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.retention(), Some(Duration::from_secs(30 * 86_400)));

        let yaml = "topics:\n  - name: t\noutput:\n  retention_days: 0\n";
        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.retention(), None);

        let yaml = "topics:\n  - name: t\noutput:\n  directory: out\n  retention_days: 7\n";
        let config = RunConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = RunConfig::from_file("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
