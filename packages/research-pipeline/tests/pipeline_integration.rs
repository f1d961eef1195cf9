//! Integration tests for the full topic pipeline.
//!
//! These drive search collection, the gates, cross-run memory, ranking and
//! the JSON writer together using mock collaborators.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use research_pipeline::{
    deduplicate, filter_by_date, filter_by_keywords, write_research_data, CrossRunMemory,
    FailingScorer, MockScorer, MockSearcher, ResearchPipeline, RunConfig, ScoreResult, SearchHit,
    Topic,
};

fn urls(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(|h| h.url.as_str()).collect()
}

fn agents_topic() -> Topic {
    Topic::new("LLM agents")
        .with_keywords(["agent"])
        .with_queries(["llm agents engineering", "agentic workflows 2025"])
}

#[test]
fn test_date_then_dedup_scenario() {
    let dated = vec![
        SearchHit::new("Paper A", "a").with_year("2023"),
        SearchHit::new("Paper A", "a").with_year("2023"),
        SearchHit::new("Paper B", "b").with_year("2025"),
    ];
    assert_eq!(urls(&filter_by_date(dated, 2024)), vec!["b"]);

    let undated = vec![
        SearchHit::new("Paper A", "a"),
        SearchHit::new("Paper A (mirror)", "a"),
        SearchHit::new("Paper B", "b"),
    ];
    assert_eq!(urls(&deduplicate(undated)), vec!["a", "b"]);
}

#[test]
fn test_gates_preserve_order_and_are_idempotent() {
    let hits = vec![
        SearchHit::new("Agent planning", "https://e.com/5").with_year("2025"),
        SearchHit::new("Old agent work", "https://e.com/1").with_year("2019"),
        SearchHit::new("Agent tools", "https://e.com/3"),
        SearchHit::new("agent tools!", "https://e.com/4"),
        SearchHit::new("Bridges", "https://e.com/2").with_snippet("concrete"),
    ];
    let keywords = vec!["agent".to_string()];

    let once = filter_by_keywords(deduplicate(filter_by_date(hits, 2024)), &keywords);
    assert_eq!(urls(&once), vec!["https://e.com/5", "https://e.com/3"]);

    let twice = filter_by_keywords(
        deduplicate(filter_by_date(once.clone(), 2024)),
        &keywords,
    );
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_end_to_end_ai_mode() {
    let searcher = MockSearcher::new()
        .with_results(
            "llm agents engineering",
            vec![
                SearchHit::new("Agents for structural design", "https://a.com").with_year("2025"),
                SearchHit::new("Agent benchmarks", "https://b.com"),
                SearchHit::new("Legacy agent study", "https://old.com").with_year("2021"),
            ],
        )
        .with_results(
            "agentic workflows 2025",
            vec![
                SearchHit::new("Agents for Structural Design!", "https://a-mirror.com"),
                SearchHit::new("Agent marketing page", "https://c.com"),
                SearchHit::new("Reported last week: agent survey", "https://seen.com"),
            ],
        );
    let scorer = MockScorer::new()
        .with_score("https://a.com", 0.7)
        .with_score("https://b.com", 0.92)
        .with_score("https://c.com", 0.3);
    let memory = Arc::new(CrossRunMemory::from_urls(["https://seen.com"]));
    let config = RunConfig::new()
        .with_topics([agents_topic()])
        .with_required_keywords(["agent"])
        .with_top_n(5);

    let pipeline = ResearchPipeline::new(config, memory, scorer);
    let outcome = pipeline
        .research_topic(&searcher, &agents_topic(), true)
        .await;

    assert_eq!(urls(&outcome.hits), vec!["https://b.com", "https://a.com"]);
    assert_eq!(outcome.hits[0].relevance_score, 0.92);
    assert_eq!(outcome.counts.raw, 6);
    assert_eq!(outcome.counts.after_date, 5);
    assert_eq!(outcome.counts.after_dedup, 4);
    assert_eq!(outcome.counts.after_cross_run, 3);

    // Only hits that survived the gates reach the scorer.
    let mut scored = pipeline.ranker().scorer().calls();
    scored.sort();
    assert_eq!(scored, vec!["https://a.com", "https://b.com", "https://c.com"]);
}

#[tokio::test]
async fn test_failing_scorer_never_aborts_topic() {
    let pipeline = ResearchPipeline::new(
        RunConfig::new().with_topics([agents_topic()]),
        Arc::new(CrossRunMemory::new()),
        FailingScorer,
    );
    let hits = vec![
        SearchHit::new("One", "https://1.com"),
        SearchHit::new("Two", "https://2.com"),
    ];

    let scored = pipeline
        .ranker()
        .score_all(hits.clone(), &agents_topic())
        .await;
    assert_eq!(scored.len(), 2);
    assert!(scored.iter().all(|s| s.score == ScoreResult::fail_open()));

    // Fail-open scores sit below the threshold, so the topic completes empty.
    let outcome = pipeline.process_topic(&agents_topic(), hits, true).await;
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.counts.after_keywords, 2);
}

#[tokio::test]
async fn test_fallback_mode_sorts_by_year() {
    let pipeline = ResearchPipeline::new(
        RunConfig::new().with_topics([agents_topic()]).with_top_n(3),
        Arc::new(CrossRunMemory::new()),
        MockScorer::new(),
    );
    let hits = vec![
        SearchHit::new("Undated", "https://u.com"),
        SearchHit::new("2024 paper", "https://x.com").with_year("2024"),
        SearchHit::new("2026 paper", "https://y.com").with_year("2026"),
        SearchHit::new("2025 paper", "https://z.com").with_year("2025"),
    ];

    let outcome = pipeline.process_topic(&agents_topic(), hits, false).await;
    assert_eq!(
        urls(&outcome.hits),
        vec!["https://y.com", "https://z.com", "https://x.com"]
    );
}

#[tokio::test]
async fn test_second_run_skips_first_run_urls() {
    let temp = tempfile::tempdir().unwrap();
    let searcher = MockSearcher::new().with_results(
        "llm agents engineering",
        vec![
            SearchHit::new("Agent paper one", "https://one.com"),
            SearchHit::new("Agent paper two", "https://two.com"),
        ],
    );
    let config = RunConfig::new()
        .with_topics([agents_topic()])
        .with_top_n(1)
        .with_ai_filtering(false)
        .with_output_dir(temp.path());

    // First run reports only the top hit.
    let memory = Arc::new(CrossRunMemory::load(temp.path()));
    let first = ResearchPipeline::new(config.clone(), memory, MockScorer::new());
    let report = first.run(&searcher, false).await;
    assert_eq!(urls(report.get("LLM agents").unwrap()), vec!["https://one.com"]);
    let ts = Local.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    write_research_data(&report, temp.path(), ts).unwrap();

    // Second run sees it in memory and moves on to the next hit.
    let memory = Arc::new(CrossRunMemory::load(temp.path()));
    assert!(memory.contains("https://one.com"));
    let second = ResearchPipeline::new(config, memory, MockScorer::new());
    let report = second.run(&searcher, false).await;
    assert_eq!(urls(report.get("LLM agents").unwrap()), vec!["https://two.com"]);
}
