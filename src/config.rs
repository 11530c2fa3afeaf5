// ABOUTME: Configuration module for the feed-slides application
// ABOUTME: Provides service settings and environment variable handling

use crate::batch::BatchOptions;
use crate::errors::{FeedError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_PACING_MS: u64 = 2000;
const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub pacing_ms: u64,
    pub timeout_ms: u64,
    /// API key taken from the environment; wins over the stored credential.
    pub api_key: Option<String>,
    pub credentials_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            pacing_ms: DEFAULT_PACING_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
            credentials_path: default_credentials_path(),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let number = |name: &str, fallback: u64| {
            env::var(name)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(fallback)
        };

        Self {
            api_base: env::var("FEED_SLIDES_API_BASE").unwrap_or(defaults.api_base),
            image_model: env::var("FEED_SLIDES_IMAGE_MODEL").unwrap_or(defaults.image_model),
            text_model: env::var("FEED_SLIDES_TEXT_MODEL").unwrap_or(defaults.text_model),
            pacing_ms: number("FEED_SLIDES_PACING_MS", defaults.pacing_ms),
            timeout_ms: number("FEED_SLIDES_TIMEOUT_MS", defaults.timeout_ms),
            api_key: env::var("GEMINI_API_KEY").ok().filter(|key| !key.trim().is_empty()),
            credentials_path: env::var("FEED_SLIDES_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
        }
    }

    /// Parsed service base URL, always ending in `/` so model paths join beneath it.
    pub fn api_base_url(&self) -> Result<Url> {
        let mut base = self.api_base.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).map_err(|e| {
            FeedError::ConfigError(format!("Invalid API base URL {:?}: {}", self.api_base, e))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get batch options with defaults from this config
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            pacing: Duration::from_millis(self.pacing_ms),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("feed-slides")
        .join("credentials.json")
}
