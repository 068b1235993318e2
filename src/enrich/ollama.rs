//! Ollama enricher using the `/api/chat` API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{check_http_response, ContentEnricher, EnrichError, ENRICH_SYSTEM_PROMPT};

/// Default Ollama API base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Ollama chat API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OllamaRequest {
    /// Model name.
    pub model: String,
    /// System instruction plus the user content.
    pub messages: Vec<OllamaMessage>,
    /// Disable streaming; enrichment waits for the full rewrite.
    pub stream: bool,
}

/// A message in Ollama format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

/// Ollama chat API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OllamaResponse {
    /// Response message.
    pub message: OllamaResponseMessage,
    /// Model that served the response.
    pub model: String,
}

/// The message part of an Ollama response.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OllamaResponseMessage {
    /// Message content.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build an Ollama API request for an enrichment call.
#[doc(hidden)]
pub fn build_request(model: &str, content: &str) -> OllamaRequest {
    OllamaRequest {
        model: model.to_owned(),
        messages: vec![
            OllamaMessage {
                role: "system".to_owned(),
                content: ENRICH_SYSTEM_PROMPT.to_owned(),
            },
            OllamaMessage {
                role: "user".to_owned(),
                content: content.to_owned(),
            },
        ],
        stream: false,
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
    let response: OllamaResponse =
        serde_json::from_str(body).map_err(|e| EnrichError::Parse(e.to_string()))?;
    let text = response.message.content.trim().to_owned();
    if text.is_empty() {
        return Err(EnrichError::Empty);
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Ollama chat API enricher.
#[derive(Debug, Clone)]
pub struct OllamaEnricher {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaEnricher {
    /// Create an Ollama enricher for a model at a base URL.
    pub fn new(model: String, base_url: String) -> Self {
        Self {
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentEnricher for OllamaEnricher {
    async fn enrich(&self, content: &str) -> Result<String, EnrichError> {
        let request = build_request(&self.model, content);
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let response = self.client.post(&url).json(&request).send().await?;
        let body = check_http_response(response).await?;
        parse_response(&body)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
