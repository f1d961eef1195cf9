//! LLM prompts for relevance scoring.

use crate::types::{hit::SearchHit, topic::Topic};

/// Snippet characters included in the relevance prompt.
pub const PROMPT_SNIPPET_CHARS: usize = 300;

/// System prompt for the relevance scorer.
pub const RELEVANCE_SYSTEM_PROMPT: &str = "You are a research analyst screening web search \
results for a literature review. You answer with a single JSON object and nothing else.";

/// Prompt for judging one search result against a topic.
pub const RELEVANCE_PROMPT: &str = r#"Assess how relevant this search result is to the research topic.

Topic: {topic_name}
Topic keywords: {keywords}

Result title: {title}
Result URL: {url}
Result snippet: {snippet}

Consider whether the result is substantive work (research, case study, technical report)
on the topic rather than marketing, news aggregation, or an unrelated use of the keywords.

Output JSON:
{
    "relevance_score": 0.0 to 1.0,
    "is_relevant": true | false,
    "reasoning": "one sentence"
}"#;

/// Fill [`RELEVANCE_PROMPT`] for a hit and topic.
pub fn format_relevance_prompt(hit: &SearchHit, topic: &Topic) -> String {
    let snippet: String = hit.snippet.chars().take(PROMPT_SNIPPET_CHARS).collect();

    RELEVANCE_PROMPT
        .replace("{topic_name}", &topic.name)
        .replace("{keywords}", &topic.keywords.join(", "))
        .replace("{title}", &hit.title)
        .replace("{url}", &hit.url)
        .replace("{snippet}", &snippet)
}
