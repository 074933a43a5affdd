//! Configuration resolution and loading for the CueMap client.
//!
//! [`ClientConfig::resolve`] turns a partially-filled configuration into an
//! immutable [`ClientContext`], filling defaults. It never touches the network
//! or the filesystem and cannot fail; a bad URL surfaces on the first request.
//!
//! Optional loading layers sit on top: a TOML file ([`ClientConfig::load_from`])
//! and `CUEMAP_*` environment variables ([`ClientConfig::from_env`]), combined
//! with [`ClientConfig::merge`].

use cuemap_core::ClientContext;
use cuemap_core::context::redact;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_URL: &str = "CUEMAP_URL";
pub const ENV_API_KEY: &str = "CUEMAP_API_KEY";
pub const ENV_PROJECT_ID: &str = "CUEMAP_PROJECT_ID";
pub const ENV_TIMEOUT_MS: &str = "CUEMAP_TIMEOUT_MS";

/// Client configuration. Every field is optional and defaulted on resolve.
///
/// Accepts both `snake_case` and `camelCase` keys when deserialized.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Engine base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Tenancy identifier
    #[serde(default, alias = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, alias = "timeoutMs", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("project_id", &self.project_id)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn project_id(mut self, project: impl Into<String>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Produce the immutable client context, filling defaults.
    pub fn resolve(self) -> ClientContext {
        ClientContext::new(
            self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            self.api_key,
            self.project_id,
            Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
        )
    }

    /// Field-wise override: values set in `other` win.
    pub fn merge(self, other: ClientConfig) -> Self {
        Self {
            url: other.url.or(self.url),
            api_key: other.api_key.or(self.api_key),
            project_id: other.project_id.or(self.project_id),
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error and yields an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read `CUEMAP_URL`, `CUEMAP_API_KEY`, `CUEMAP_PROJECT_ID`, `CUEMAP_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_ms = match lookup(ENV_TIMEOUT_MS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_MS,
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            url: lookup(ENV_URL),
            api_key: lookup(ENV_API_KEY),
            project_id: lookup(ENV_PROJECT_ID),
            timeout_ms,
        })
    }

    /// File at `path` (if any), overridden by environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load_from(path)?.merge(Self::from_env()?))
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value in {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
}
