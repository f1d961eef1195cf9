//! Cross-run memory of URLs reported by earlier runs.
//!
//! Rebuilt at process start by scanning the `research_data_*.json` files the
//! JSON writer persisted in the output directory. It is never written back
//! during a run: URLs reported now become "seen" on the next invocation,
//! once this run's output is on disk.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::hit::SearchHit;

/// File-name prefix of persisted research data.
pub const RESEARCH_DATA_PREFIX: &str = "research_data_";

/// The only part of a persisted report the memory needs.
#[derive(Debug, Deserialize)]
struct PersistedReport {
    #[serde(default)]
    topics: HashMap<String, Vec<serde_json::Value>>,
}

/// Set of URLs already reported in prior runs.
///
/// Immutable once built; share it across topics behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CrossRunMemory {
    urls: HashSet<String>,
}

impl CrossRunMemory {
    /// An empty memory (first run, or memory disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit set of URLs.
    pub fn from_urls(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls.into_iter().map(|u| u.into()).collect(),
        }
    }

    /// Scan `output_dir` for persisted research data and collect every URL.
    ///
    /// Never fails: a missing directory yields an empty memory, and
    /// unreadable or malformed files are skipped with a warning.
    pub fn load(output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref();
        let mut urls = HashSet::new();

        for path in research_data_files(output_dir) {
            match read_report_urls(&path) {
                Ok(found) => urls.extend(found),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Could not load previous output");
                }
            }
        }

        tracing::info!(
            url_count = urls.len(),
            dir = %output_dir.display(),
            "Loaded URLs from previous runs"
        );
        Self { urls }
    }

    /// Whether `url` was reported before.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of remembered URLs.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Drop hits whose URL was reported before. See [`filter_seen`].
    pub fn filter(&self, hits: Vec<SearchHit>) -> Vec<SearchHit> {
        filter_seen(hits, self)
    }
}

/// Remove hits whose URL is in `memory`, preserving order.
///
/// Returns the input untouched when the memory is empty.
pub fn filter_seen(hits: Vec<SearchHit>, memory: &CrossRunMemory) -> Vec<SearchHit> {
    if memory.is_empty() {
        return hits;
    }

    let before = hits.len();
    let filtered: Vec<SearchHit> = hits
        .into_iter()
        .filter(|hit| !memory.contains(&hit.url))
        .collect();

    let removed = before - filtered.len();
    if removed > 0 {
        tracing::info!(removed, "Removed URLs seen in previous runs");
    }
    filtered
}

/// Persisted research data files in `dir`, sorted by name.
fn research_data_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                tracing::warn!(dir = %dir.display(), error = %e, "Could not read output directory");
            }
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(RESEARCH_DATA_PREFIX) && n.ends_with(".json"))
        })
        .collect();

    files.sort();
    files
}

fn read_report_urls(path: &Path) -> crate::error::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|source| crate::error::PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report: PersistedReport = serde_json::from_str(&raw)?;

    Ok(report
        .topics
        .into_values()
        .flatten()
        .filter_map(|hit| hit.get("url").and_then(|u| u.as_str()).map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_filter_scenario() {
        let memory = CrossRunMemory::from_urls(["b"]);
        let hits = vec![SearchHit::new("A", "a"), SearchHit::new("B", "b")];

        let kept = memory.filter(hits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "a");
    }

    #[test]
    fn test_filter_preserves_order() {
        let memory = CrossRunMemory::from_urls(["b"]);
        let hits = vec![
            SearchHit::new("A", "a"),
            SearchHit::new("B", "b"),
            SearchHit::new("C", "c"),
            SearchHit::new("D", "d"),
        ];

        let kept = filter_seen(hits, &memory);
        let urls: Vec<_> = kept.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_empty_memory_is_noop() {
        let hits = vec![SearchHit::new("A", "a"), SearchHit::new("A", "a")];
        assert_eq!(filter_seen(hits.clone(), &CrossRunMemory::new()), hits);
    }

    #[test]
    fn test_load_collects_urls_from_matching_files() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();

        fs::write(
            dir.join("research_data_20250101_120000.json"),
            r#"{"generated_at": "2025-01-01T12:00:00", "topics": {
                "LLM agents": [{"url": "https://a.com"}, {"url": "https://b.com"}],
                "RAG": [{"title": "no url here"}]
            }}"#,
        )
        .unwrap();
        fs::write(
            dir.join("research_data_20250102_120000.json"),
            r#"{"topics": {"RAG": [{"url": "https://c.com", "title": "c"}]}}"#,
        )
        .unwrap();
        // Wrong prefix and wrong extension are ignored.
        fs::write(
            dir.join("research_report_20250101.json"),
            r#"{"topics": {"x": [{"url": "https://ignored.com"}]}}"#,
        )
        .unwrap();
        fs::write(dir.join("research_data_notes.txt"), "https://ignored.com").unwrap();

        let memory = CrossRunMemory::load(dir);
        assert_eq!(memory.len(), 3);
        assert!(memory.contains("https://a.com"));
        assert!(memory.contains("https://c.com"));
        assert!(!memory.contains("https://ignored.com"));
    }

    #[test]
    fn test_load_skips_malformed_files() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();

        fs::write(dir.join("research_data_bad.json"), "{ not json").unwrap();
        fs::write(
            dir.join("research_data_wrong_shape.json"),
            r#"{"topics": ["not", "a", "map"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("research_data_good.json"),
            r#"{"topics": {"t": [{"url": "https://ok.com"}]}}"#,
        )
        .unwrap();

        let memory = CrossRunMemory::load(dir);
        assert_eq!(memory.len(), 1);
        assert!(memory.contains("https://ok.com"));
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let memory = CrossRunMemory::load(temp.path().join("does-not-exist"));
        assert!(memory.is_empty());
    }
}
