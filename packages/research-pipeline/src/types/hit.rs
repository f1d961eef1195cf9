//! Search hit type.

use serde::{Deserialize, Serialize};

/// One item discovered by a search query.
///
/// Hits are created by a [`WebSearcher`](crate::traits::searcher::WebSearcher),
/// flow read-only through the gates and are only mutated by the ranker,
/// which assigns `relevance_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Title of the page.
    pub title: String,

    /// Page URL. Identifies the hit within a run and across runs.
    pub url: String,

    /// Bounded excerpt of the page content.
    #[serde(default)]
    pub snippet: String,

    /// Publication year as reported upstream. May be absent or unparsable.
    #[serde(default, alias = "published_date")]
    pub published_year: Option<String>,

    /// Host of the URL, if it could be derived.
    #[serde(default, alias = "domain")]
    pub source_domain: Option<String>,

    /// Relevance in `[0.0, 1.0]`, set only by the ranker.
    #[serde(default)]
    pub relevance_score: f64,

    /// AI-generated summary. Not produced by the current pipeline.
    #[serde(default)]
    pub ai_summary: Option<String>,
}

impl SearchHit {
    /// Create a hit with a title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
            published_year: None,
            source_domain: None,
            relevance_score: 0.0,
            ai_summary: None,
        }
    }

    /// Set the snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.published_year = Some(year.into());
        self
    }

    /// Set the source domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.source_domain = Some(domain.into());
        self
    }

    /// Parsed publication year, if present and numeric.
    pub fn year(&self) -> Option<i32> {
        self.published_year
            .as_deref()
            .and_then(|y| y.trim().parse().ok())
    }

    /// Title and snippet joined by a space, lower-cased.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.snippet).to_lowercase()
    }
}
