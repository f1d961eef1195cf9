//! Tavily-backed web searcher.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::security::SecretString;
use crate::traits::searcher::{SearchOptions, WebSearcher};
use crate::types::hit::SearchHit;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Maximum snippet length in characters.
pub const MAX_SNIPPET_CHARS: usize = 500;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("valid year regex"));

/// Tavily search request.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    #[serde(skip_serializing_if = "is_empty_list")]
    include_domains: &'a [String],
    #[serde(skip_serializing_if = "is_empty_list")]
    exclude_domains: &'a [String],
}

fn is_empty_list(list: &&[String]) -> bool {
    list.is_empty()
}

/// Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// A single Tavily search result.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TavilyResult {
    title: Option<String>,
    url: String,
    content: Option<String>,
    published_date: Option<String>,
}

/// Web searcher using Tavily's search API.
pub struct TavilySearcher {
    api_key: SecretString,
    client: reqwest::Client,
    endpoint: String,
}

impl TavilySearcher {
    /// Create a new Tavily searcher with a 30 second request timeout.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, SearchError> {
        Self::with_timeout(api_key, Duration::from_secs(30))
    }

    /// Create a new Tavily searcher with a custom request timeout.
    pub fn with_timeout(
        api_key: impl Into<SecretString>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Http(Box::new(e)))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }

    /// Point at a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let request = TavilyRequest {
            api_key: self.api_key.expose(),
            query,
            max_results: options.max_results,
            search_depth: &options.search_depth,
            include_answer: false,
            include_raw_content: false,
            include_domains: &options.include_domains,
            exclude_domains: &options.exclude_domains,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        query: query.to_string(),
                    }
                } else {
                    SearchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Http(Box::new(e)))?;

        let hits: Vec<SearchHit> = tavily_response
            .results
            .into_iter()
            .map(hit_from_result)
            .collect();

        tracing::info!(query = %query, count = hits.len(), "Found results for query");
        Ok(hits)
    }
}

fn hit_from_result(result: TavilyResult) -> SearchHit {
    let title = result.title.unwrap_or_else(|| "No title".to_string());
    let content = result.content.unwrap_or_default();

    let published_year = extract_year(&format!("{} {}", title, content))
        .or_else(|| result.published_date.as_deref().and_then(extract_year));

    SearchHit {
        source_domain: extract_domain(&result.url),
        snippet: content.chars().take(MAX_SNIPPET_CHARS).collect(),
        title,
        url: result.url,
        published_year,
        relevance_score: 0.0,
        ai_summary: None,
    }
}

/// Host of `url`, if it parses.
pub fn extract_domain(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// First standalone 20xx year in `text`.
pub fn extract_year(text: &str) -> Option<String> {
    YEAR_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
