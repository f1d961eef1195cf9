//! JSON research-data writer.
//!
//! The files written here are what [`CrossRunMemory`](crate::filters::CrossRunMemory)
//! scans on the next run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::filters::cross_run::RESEARCH_DATA_PREFIX;
use crate::types::report::ResearchReport;

/// On-disk shape of a research data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchData {
    /// When the run finished (RFC 3339).
    pub generated_at: String,

    /// Topic name to ordered hits.
    pub topics: ResearchReport,
}

/// Path of the research data file for a run finishing at `timestamp`.
pub fn research_data_path(dir: &Path, timestamp: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}{}.json",
        RESEARCH_DATA_PREFIX,
        timestamp.format("%Y%m%d_%H%M%S")
    ))
}

/// Write `report` as `research_data_<timestamp>.json` in `dir`.
///
/// Creates `dir` if needed and returns the written path.
pub fn write_research_data(
    report: &ResearchReport,
    dir: impl AsRef<Path>,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = research_data_path(dir, timestamp);
    tracing::info!(path = %path.display(), "Generating JSON output");

    let data = ResearchData {
        generated_at: timestamp.to_rfc3339(),
        topics: report.clone(),
    };
    let json = serde_json::to_string_pretty(&data)?;

    std::fs::write(&path, json).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(topics = report.len(), hits = report.total_hits(), "JSON file generated");
    Ok(path)
}
