// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `config.toml` in the natura config directory
//! (`$XDG_CONFIG_HOME/natura/` on Linux) or from an explicit path. Every key
//! is optional; a missing file means all defaults.
//!
//! ```toml
//! base_url = "http://localhost:7186"
//! request_timeout_ms = 10000
//! max_pending_requests = 64
//!
//! [realtime]
//! topic = "observationHub"
//! max_retries = 10
//! ```

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "natura";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid {field}: '{url}'\n  hint: expected an absolute http(s):// or ws(s):// URL")]
    InvalidUrl { field: &'static str, url: String },

    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the HTTP backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for a single request attempt, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Path of the credential refresh endpoint.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Endpoints whose 401 must never trigger a refresh (login, signup).
    /// The refresh path is always treated as one of these.
    #[serde(default = "default_auth_boundary_paths")]
    pub auth_boundary_paths: Vec<String>,
    /// Maximum requests allowed to wait on a refresh. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pending_requests: Option<usize>,
    /// Push channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

/// Push channel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Push endpoint root. Derived from `base_url` (http → ws) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Topic path appended to the endpoint root.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Maximum reconnection attempts before giving up (0 = unlimited).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial delay for exponential backoff (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (seconds).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:7186".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_refresh_path() -> String {
    "/auth/refresh".to_string()
}

fn default_auth_boundary_paths() -> Vec<String> {
    vec!["/auth/login".to_string(), "/users/simple".to_string()]
}

fn default_topic() -> String {
    "observationHub".to_string()
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            refresh_path: default_refresh_path(),
            auth_boundary_paths: default_auth_boundary_paths(),
            max_pending_requests: None,
            realtime: RealtimeConfig::default(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        RealtimeConfig {
            url: None,
            topic: default_topic(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl ClientConfig {
    /// Returns the default config file location, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads and validates configuration from the given file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClientConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path`, or from the default location when `path` is None.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) if p.is_file() => Self::load(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks URLs and numeric limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("base_url", &self.base_url, &["http", "https"])?;
        if let Some(ref url) = self.realtime.url {
            parse_url("realtime.url", url, &["ws", "wss", "http", "https"])?;
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if self.realtime.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "realtime.initial_delay_ms",
                reason: "must be greater than zero",
            });
        }
        if self.max_pending_requests == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_pending_requests",
                reason: "must be greater than zero when set",
            });
        }
        if !self.refresh_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "refresh_path",
                reason: "must start with '/'",
            });
        }
        Ok(())
    }

    /// Timeout applied to each request attempt.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Full URL of the push channel for the configured topic.
    ///
    /// Uses `realtime.url` when set, otherwise the base URL with its scheme
    /// mapped http → ws and https → wss.
    pub fn realtime_url(&self) -> Result<String, ConfigError> {
        let (field, root) = match self.realtime.url {
            Some(ref url) => ("realtime.url", url.as_str()),
            None => ("base_url", self.base_url.as_str()),
        };
        let mut url = parse_url(field, root, &["ws", "wss", "http", "https"])?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            _ => "wss",
        };
        url.set_scheme(scheme)
            .map_err(|()| ConfigError::InvalidUrl {
                field,
                url: root.to_string(),
            })?;

        let base = url.as_str().trim_end_matches('/');
        let topic = self.realtime.topic.trim_start_matches('/');
        Ok(format!("{}/{}", base, topic))
    }
}

fn parse_url(field: &'static str, url: &str, schemes: &[&str]) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        field,
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !schemes.contains(&parsed.scheme()) || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
