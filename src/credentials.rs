// ABOUTME: Credential storage for the feed-slides application
// ABOUTME: Persists the generation API key in a small JSON file

use crate::errors::{FeedError, Result};
use crate::utils::ensure_parent_directory_exists;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the API key is stored.
pub const API_KEY_FIELD: &str = "gemini_api_key";

/// JSON file holding the API key. Other keys in the file are left untouched.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, or `None` when the file or entry is missing or blank.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!("No credential file at {:?}", self.path);
            return Ok(None);
        }
        let entries = self.read_entries()?;
        Ok(entries
            .get(API_KEY_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string))
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FeedError::ValidationError("API key is empty".to_string()));
        }
        let mut entries = if self.path.exists() {
            self.read_entries()?
        } else {
            Map::new()
        };
        entries.insert(API_KEY_FIELD.to_string(), Value::String(api_key.to_string()));

        ensure_parent_directory_exists(&self.path)?;
        let json = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, json).map_err(FeedError::FileReadError)?;
        info!("API key saved to {:?}", self.path);
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(&self.path).map_err(FeedError::FileReadError)?;
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(FeedError::ConfigError(format!(
                "Credential file {:?} is not a JSON object",
                self.path
            ))),
        }
    }
}

/// Environment key first, then the stored one.
pub fn resolve_api_key(env_key: Option<&str>, store: &CredentialStore) -> Result<Option<String>> {
    if let Some(key) = env_key.map(str::trim).filter(|key| !key.is_empty()) {
        return Ok(Some(key.to_string()));
    }
    store.load()
}
