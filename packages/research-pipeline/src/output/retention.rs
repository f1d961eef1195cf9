//! Output retention.
//!
//! Old run files are pruned before cross-run memory is loaded, so the memory
//! only reaches back as far as the retention window.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// File-name prefix of every file a run writes.
pub const OUTPUT_PREFIX: &str = "research_";

/// Delete `research_*` files in `dir` last modified more than `max_age` ago.
///
/// Returns the number of files removed. Never fails: a missing directory
/// prunes nothing, and files that cannot be inspected or removed are
/// skipped with a warning.
pub fn prune_old_outputs(dir: impl AsRef<Path>, max_age: Duration) -> usize {
    let dir = dir.as_ref();
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return 0;
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for path in entries.filter_map(Result::ok).map(|entry| entry.path()) {
        let is_output = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(OUTPUT_PREFIX));
        if !is_output {
            continue;
        }

        let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read file age");
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed old output");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not remove old output");
            }
        }
    }

    if removed > 0 {
        tracing::info!(removed, dir = %dir.display(), "Cleaned up old output files");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::CrossRunMemory;
    use std::fs::{self, File};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn write_aged(path: &Path, contents: &str, age: Duration) {
        fs::write(path, contents).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    #[test]
    fn test_prunes_only_old_research_files() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();

        write_aged(&dir.join("research_data_20240101_000000.json"), "{}", DAY * 40);
        write_aged(&dir.join("research_report_20240101.md"), "# old", DAY * 40);
        write_aged(&dir.join("research_data_20250101_000000.json"), "{}", DAY * 2);
        write_aged(&dir.join("notes.txt"), "keep me", DAY * 90);

        let removed = prune_old_outputs(dir, DAY * 30);
        assert_eq!(removed, 2);
        assert!(!dir.join("research_data_20240101_000000.json").exists());
        assert!(!dir.join("research_report_20240101.md").exists());
        assert!(dir.join("research_data_20250101_000000.json").exists());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_pruned_urls_leave_memory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();

        write_aged(
            &dir.join("research_data_20240101_000000.json"),
            r#"{"topics": {"t": [{"url": "https://expired.com"}]}}"#,
            DAY * 31,
        );
        write_aged(
            &dir.join("research_data_20250101_000000.json"),
            r#"{"topics": {"t": [{"url": "https://recent.com"}]}}"#,
            DAY,
        );

        prune_old_outputs(dir, DAY * 30);
        let memory = CrossRunMemory::load(dir);
        assert!(!memory.contains("https://expired.com"));
        assert!(memory.contains("https://recent.com"));
    }

    #[test]
    fn test_missing_dir_prunes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(prune_old_outputs(temp.path().join("absent"), DAY), 0);
    }
}
