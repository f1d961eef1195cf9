//! Publication-year gate.

use crate::types::hit::SearchHit;

/// Drop hits published before `min_year`.
///
/// Hits without a year, or with a year that does not parse as an integer,
/// are kept.
pub fn filter_by_date(hits: Vec<SearchHit>, min_year: i32) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|hit| match hit.year() {
            Some(year) if year < min_year => {
                tracing::debug!(title = %hit.title, year, "Filtered out (old)");
                false
            }
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_only_old_years() {
        let hits = vec![
            SearchHit::new("old", "a").with_year("2023"),
            SearchHit::new("same", "b").with_year("2024"),
            SearchHit::new("new", "c").with_year("2025"),
        ];

        let kept = filter_by_date(hits, 2024);
        let urls: Vec<_> = kept.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(urls, vec!["b", "c"]);
    }

    #[test]
    fn test_keeps_missing_and_unparsable_years() {
        let hits = vec![
            SearchHit::new("undated", "a"),
            SearchHit::new("garbled", "b").with_year("20x4"),
            SearchHit::new("empty", "c").with_year(""),
        ];

        assert_eq!(filter_by_date(hits.clone(), 2024), hits);
    }

    #[test]
    fn test_duplicate_old_hits_scenario() {
        let hits = vec![
            SearchHit::new("A", "a").with_year("2023"),
            SearchHit::new("A", "a").with_year("2023"),
            SearchHit::new("B", "b").with_year("2025"),
        ];

        let kept = filter_by_date(hits, 2024);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url, "b");
    }

    #[test]
    fn test_idempotent() {
        let hits = vec![
            SearchHit::new("a", "a").with_year("2020"),
            SearchHit::new("b", "b"),
            SearchHit::new("c", "c").with_year("2026"),
        ];

        let once = filter_by_date(hits, 2024);
        let twice = filter_by_date(once.clone(), 2024);
        assert_eq!(once, twice);
    }
}
