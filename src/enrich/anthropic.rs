//! Anthropic enricher using the `/v1/messages` API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{check_http_response, ContentEnricher, EnrichError, ENRICH_SYSTEM_PROMPT};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Anthropic messages API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// System prompt carrying the enrichment instruction.
    pub system: String,
    /// The single user message holding the template content.
    pub messages: Vec<AnthropicMessage>,
}

/// A message in Anthropic format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Plain-text content.
    pub content: String,
}

/// Anthropic API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// Content blocks in the response.
    pub content: Vec<AnthropicContentBlock>,
    /// Model that served the response.
    pub model: String,
}

/// A content block in the Anthropic response. Enrichment requests carry no
/// tools, so only text blocks are expected.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build an Anthropic API request for an enrichment call.
#[doc(hidden)]
pub fn build_request(model: &str, content: &str) -> AnthropicRequest {
    AnthropicRequest {
        model: model.to_owned(),
        max_tokens: DEFAULT_MAX_TOKENS,
        system: ENRICH_SYSTEM_PROMPT.to_owned(),
        messages: vec![AnthropicMessage {
            role: "user".to_owned(),
            content: content.to_owned(),
        }],
    }
}

/// Extract the enriched text from a response body.
///
/// # Errors
///
/// Returns [`EnrichError::Parse`] on malformed JSON and
/// [`EnrichError::Empty`] when the response carries no text.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, EnrichError> {
    let response: AnthropicResponse =
        serde_json::from_str(body).map_err(|e| EnrichError::Parse(e.to_string()))?;
    let text: String = response
        .content
        .iter()
        .map(|block| match block {
            AnthropicContentBlock::Text { text } => text.as_str(),
        })
        .collect();
    let text = text.trim().to_owned();
    if text.is_empty() {
        return Err(EnrichError::Empty);
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Anthropic messages API enricher.
#[derive(Debug, Clone)]
pub struct AnthropicEnricher {
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicEnricher {
    /// Create a new Anthropic enricher for a model.
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentEnricher for AnthropicEnricher {
    async fn enrich(&self, content: &str) -> Result<String, EnrichError> {
        let request = build_request(&self.model, content);
        let response = self
            .client
            .post(ANTHROPIC_API_BASE)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;
        let body = check_http_response(response).await?;
        parse_response(&body)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
