//! OpenAI implementation of the relevance scorer.
//!
//! # Example
//!
//! ```rust,ignore
//! use research_pipeline::ai::OpenAIScorer;
//!
//! let scorer = OpenAIScorer::new("sk-...").with_model("gpt-4o-mini");
//! let pipeline = ResearchPipeline::new(config, memory, scorer);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::prompts::{format_relevance_prompt, RELEVANCE_SYSTEM_PROMPT};
use crate::error::ScoreError;
use crate::pipeline::rank::RELEVANCE_THRESHOLD;
use crate::security::SecretString;
use crate::traits::scorer::{RelevanceScorer, ScoreResult};
use crate::types::{config::RunConfig, hit::SearchHit, topic::Topic};

/// Chat-completion based relevance scorer.
#[derive(Clone)]
pub struct OpenAIScorer {
    client: Client,
    api_key: SecretString,
    model: String,
    temperature: f32,
    base_url: String,
}

impl OpenAIScorer {
    /// Create a scorer with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create a scorer using the model and temperature from a run config.
    pub fn from_config(api_key: impl Into<SecretString>, config: &RunConfig) -> Self {
        Self::new(api_key)
            .with_model(config.ai_model.clone())
            .with_temperature(config.ai_temperature)
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (default: 0.3).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, ScoreError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: 256,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoreError::Transport(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScoreError::Api(format!("OpenAI API error {}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoreError::MalformedResponse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ScoreError::MalformedResponse("no choices in OpenAI response".into()))
    }
}

#[async_trait]
impl RelevanceScorer for OpenAIScorer {
    async fn score(&self, hit: &SearchHit, topic: &Topic) -> Result<ScoreResult, ScoreError> {
        let prompt = format_relevance_prompt(hit, topic);
        let content = self.chat(RELEVANCE_SYSTEM_PROMPT, &prompt).await?;
        let result = parse_score_response(&content)?;

        tracing::debug!(
            url = %hit.url,
            score = result.relevance_score,
            is_relevant = result.is_relevant,
            "Scored result"
        );
        Ok(result)
    }
}

// =========================================================================
// Response parsing
// =========================================================================

#[derive(Debug, Deserialize)]
struct RawScore {
    relevance_score: serde_json::Value,
    is_relevant: Option<bool>,
    reasoning: Option<String>,
}

/// Parse a model reply into a [`ScoreResult`].
///
/// Accepts fenced or bare JSON and a numeric or numeric-string score. The
/// score must lie in `[0.0, 1.0]`.
pub fn parse_score_response(content: &str) -> Result<ScoreResult, ScoreError> {
    let json = strip_code_blocks(content);
    let raw: RawScore = serde_json::from_str(json)
        .map_err(|e| ScoreError::MalformedResponse(format!("{}: {}", e, json)))?;

    let score = match &raw.relevance_score {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        ScoreError::MalformedResponse(format!("relevance_score not numeric: {}", raw.relevance_score))
    })?;

    if !(0.0..=1.0).contains(&score) {
        return Err(ScoreError::ScoreOutOfRange(score));
    }

    Ok(ScoreResult {
        relevance_score: score,
        is_relevant: raw.is_relevant.unwrap_or(score >= RELEVANCE_THRESHOLD),
        reasoning: raw.reasoning.unwrap_or_default(),
    })
}

/// Strip markdown code fences from a response.
fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

// =========================================================================
// Wire types
// =========================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}
