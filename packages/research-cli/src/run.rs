//! One research run: config, credentials, pipeline, output.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use research_pipeline::ai::OpenAIScorer;
use research_pipeline::{
    prune_old_outputs, write_research_data, ApiCredentials, CrossRunMemory, DisabledScorer,
    RelevanceScorer, ResearchPipeline, ResearchReport, RunConfig, TavilySearcher,
};

use crate::Cli;

pub async fn execute(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let use_ai = !cli.no_ai && config.use_ai_filtering;

    tracing::info!(
        config = %cli.config.display(),
        topics = config.topics.len(),
        min_year = config.min_year,
        top_n = config.top_n,
        use_ai,
        "Starting research run"
    );

    let credentials =
        ApiCredentials::from_env(use_ai).context("Missing API credentials (check .env)")?;

    match config.retention() {
        Some(max_age) if !cli.dry_run => {
            prune_old_outputs(&config.output_dir, max_age);
        }
        Some(_) => tracing::info!("Dry run, skipping output cleanup"),
        None => {}
    }

    let memory = Arc::new(CrossRunMemory::load(&config.output_dir));
    tracing::info!(urls = memory.len(), "Loaded previously reported URLs");

    let searcher =
        TavilySearcher::with_timeout(credentials.tavily_api_key.clone(), config.search_timeout)
            .context("Failed to build search client")?;
    let scorer = build_scorer(use_ai, &credentials, &config);

    let output_dir = config.output_dir.clone();
    let pipeline = ResearchPipeline::new(config, memory, scorer);
    let report = pipeline.run(&searcher, use_ai).await;

    if cli.dry_run {
        tracing::info!("Dry run, skipping JSON output");
        print_summary(&report);
        return Ok(());
    }

    let path = write_research_data(&report, &output_dir, Local::now())
        .context("Failed to write research data")?;
    tracing::info!(path = %path.display(), "Research data written");

    Ok(())
}

fn load_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = RunConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(days) = cli.keep_days {
        config.retention_days = days;
    }
    Ok(config)
}

fn build_scorer(
    use_ai: bool,
    credentials: &ApiCredentials,
    config: &RunConfig,
) -> Box<dyn RelevanceScorer> {
    match (use_ai, &credentials.openai_api_key) {
        (true, Some(key)) => Box::new(OpenAIScorer::from_config(key.clone(), config)),
        _ => Box::new(DisabledScorer),
    }
}

fn print_summary(report: &ResearchReport) {
    println!();
    println!("Research summary: {} hits across {} topics", report.total_hits(), report.len());
    for (topic, hits) in report.iter() {
        println!("\n{} ({})", topic, hits.len());
        for hit in hits {
            let year = hit.published_year.as_deref().unwrap_or("----");
            println!("  [{:.2}] {} {}", hit.relevance_score, year, hit.title);
            println!("         {}", hit.url);
        }
    }
}
