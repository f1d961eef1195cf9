//! Query execution for a topic.

use std::time::Duration;

use crate::traits::searcher::{SearchOptions, WebSearcher};
use crate::types::{hit::SearchHit, topic::Topic};

/// Run every query of `topic` in order and concatenate the hits.
///
/// A failed or timed-out query is logged and contributes nothing; it never
/// aborts the topic. Duplicates across queries are left for the
/// deduplicator.
pub async fn collect_topic_hits<W: WebSearcher + ?Sized>(
    searcher: &W,
    topic: &Topic,
    options: &SearchOptions,
    timeout: Duration,
) -> Vec<SearchHit> {
    let mut all_hits = Vec::new();

    for query in &topic.search_variations {
        tracing::info!(topic = %topic.name, query = %query, "Executing search");

        match tokio::time::timeout(timeout, searcher.search(query, options)).await {
            Ok(Ok(hits)) => {
                tracing::debug!(query = %query, count = hits.len(), "Search returned results");
                all_hits.extend(hits);
            }
            Ok(Err(e)) => {
                tracing::warn!(query = %query, error = %e, "Search failed, skipping query");
            }
            Err(_) => {
                tracing::warn!(query = %query, ?timeout, "Search timed out, skipping query");
            }
        }
    }

    tracing::info!(topic = %topic.name, total = all_hits.len(), "Total results from all queries");
    all_hits
}
