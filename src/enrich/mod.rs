//! Content-enrichment gateway.
//!
//! Defines the [`ContentEnricher`] trait and the shared error and HTTP
//! plumbing used by the provider implementations:
//! - [`anthropic::AnthropicEnricher`] — Anthropic `/v1/messages` API
//! - [`ollama::OllamaEnricher`] — Ollama `/api/chat` API
//!
//! The gateway is the one true external network call in the engine, so it
//! is the only operation with a caller-supplied timeout
//! ([`enrich_with_timeout`]). It never retries; on any failure the caller's
//! original content is untouched, since enrichment only ever returns a new
//! string.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

pub mod anthropic;
pub mod ollama;

use crate::config::EnrichmentConfig;

/// System prompt given to the text-generation model.
pub const ENRICH_SYSTEM_PROMPT: &str =
    "You are an AI assistant specialized in improving message template content. \
     Given the current template content, enrich it to be more engaging and \
     effective. Reply with the enriched template content only.";

/// Errors returned by the enrichment gateway.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// HTTP transport failure.
    #[error("enrichment request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response did not match the expected schema.
    #[error("enrichment response parse error: {0}")]
    Parse(String),

    /// Upstream provider responded with an error status.
    #[error("enrichment provider returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },

    /// The provider returned no usable text.
    #[error("enrichment provider returned empty content")]
    Empty,

    /// The caller-supplied deadline elapsed.
    #[error("enrichment timed out after {0} seconds")]
    Timeout(u64),
}

/// Text-enrichment provider interface.
///
/// The engine depends only on this contract: plain text in, plain text out,
/// "semantically similar but more engaging", no formatting guarantees.
/// Implementations must be `Send + Sync` so the gateway can be shared
/// across async tasks.
#[async_trait]
pub trait ContentEnricher: Send + Sync {
    /// Rewrite `content` into a more engaging variant.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] on API, network, or parse failure.
    async fn enrich(&self, content: &str) -> Result<String, EnrichError>;

    /// The model identifier this enricher calls.
    fn model_id(&self) -> &str;
}

/// Run an enrichment under a caller-supplied deadline.
///
/// # Errors
///
/// Returns [`EnrichError::Timeout`] when the deadline elapses, otherwise
/// whatever the enricher returned.
pub async fn enrich_with_timeout(
    enricher: &dyn ContentEnricher,
    content: &str,
    timeout: Duration,
) -> Result<String, EnrichError> {
    match tokio::time::timeout(timeout, enricher.enrich(content)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichError::Timeout(timeout.as_secs())),
    }
}

/// Build the enricher named by the configuration.
///
/// # Errors
///
/// Returns an error for an unknown provider name, or for `"anthropic"`
/// without an API key.
pub fn build_enricher(config: &EnrichmentConfig) -> anyhow::Result<Box<dyn ContentEnricher>> {
    match config.provider.as_str() {
        "anthropic" => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("anthropic enrichment requires an API key")
            })?;
            Ok(Box::new(anthropic::AnthropicEnricher::new(
                config.model.clone(),
                api_key,
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaEnricher::new(
            config.model.clone(),
            config.base_url.clone(),
        ))),
        other => Err(anyhow::anyhow!("unknown enrichment provider: {other:?}")),
    }
}

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns [`EnrichError::Request`] on transport failure and
/// [`EnrichError::HttpStatus`] with a sanitized body on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, EnrichError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(EnrichError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    // Provider error bodies can echo request headers; scrub key shapes.
    let mut sanitized = collapsed;
    for pattern in [r"sk-ant-[A-Za-z0-9_\-]{10,}", r"sk-[A-Za-z0-9]{32,}"] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}
