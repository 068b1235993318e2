//! Configuration loading.
//!
//! Loads from `./sendcue.toml` (or `$SENDCUE_CONFIG_PATH`); a `.env` file
//! is honoured before resolution. Environment variables override file
//! values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::enrich::ollama::DEFAULT_OLLAMA_URL;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendcueConfig {
    /// Entity-store settings (`[store]`).
    pub store: StoreConfig,
    /// Enrichment gateway settings (`[enrichment]`).
    pub enrichment: EnrichmentConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Simulated persistence latency in milliseconds. Zero for tests.
    pub latency_ms: u64,
    /// Start from the demo fixture set instead of empty collections.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency_ms: 0,
            seed: false,
        }
    }
}

/// `[enrichment]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Provider name: `"anthropic"` or `"ollama"`.
    pub provider: String,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Base URL for local providers.
    pub base_url: String,
    /// API key for cloud providers. Usually supplied via
    /// `SENDCUE_ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,
    /// Deadline for a single enrichment call, in seconds.
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_owned(),
            model: "llama3.1:8b".to_owned(),
            base_url: DEFAULT_OLLAMA_URL.to_owned(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl SendcueConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Honours a `.env` file in the working directory. Config file path:
    /// `$SENDCUE_CONFIG_PATH` or `./sendcue.toml`; a missing file falls
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// The simulated store latency as a [`Duration`].
    pub fn store_latency(&self) -> Duration {
        Duration::from_millis(self.store.latency_ms)
    }

    /// The enrichment deadline as a [`Duration`].
    pub fn enrich_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment.timeout_secs)
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: SendcueConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(SendcueConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("SENDCUE_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("sendcue.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests can exercise precedence without
    /// mutating process environment.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Store.
        if let Some(v) = env("SENDCUE_STORE_LATENCY_MS") {
            match v.parse() {
                Ok(n) => self.store.latency_ms = n,
                Err(_) => tracing::warn!(
                    var = "SENDCUE_STORE_LATENCY_MS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SENDCUE_STORE_SEED") {
            self.store.seed = matches!(v.as_str(), "1" | "true" | "yes");
        }

        // Enrichment.
        if let Some(v) = env("SENDCUE_ENRICH_PROVIDER") {
            self.enrichment.provider = v;
        }
        if let Some(v) = env("SENDCUE_ENRICH_MODEL") {
            self.enrichment.model = v;
        }
        if let Some(v) = env("SENDCUE_OLLAMA_URL") {
            self.enrichment.base_url = v;
        }
        if let Some(key) = env("SENDCUE_ANTHROPIC_API_KEY") {
            self.enrichment.api_key = Some(key);
            self.enrichment.provider = "anthropic".to_owned();
        }
        if let Some(v) = env("SENDCUE_ENRICH_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.enrichment.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "SENDCUE_ENRICH_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }
}
