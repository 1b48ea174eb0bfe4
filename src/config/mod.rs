//! Layered configuration
//!
//! Values are resolved from built-in defaults, then an optional TOML file,
//! then `LIVE_COMMENTARY_`-prefixed environment variables (use `__` to reach
//! nested keys, e.g. `LIVE_COMMENTARY_ENGINE__UPDATE_INTERVAL=2s`). Command
//! line overrides are applied by the binary afterwards.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use crate::errors::{AppError, AppResult};
use crate::utils::url::UrlUtils;
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Where and how to reach the commentary backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path appended to `base_url`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
}

/// Scheduling and reconciliation knobs for the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum wall-clock time between two requests
    #[serde(default = "default_update_interval", with = "duration_serde::duration")]
    pub update_interval: Duration,
    /// How often the scheduler checks whether a request is due
    #[serde(default = "default_tick_interval", with = "duration_serde::duration")]
    pub tick_interval: Duration,
    /// Upper bound on a single request; expiry releases the gate
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
    /// Seconds of video the backend should consider around the timestamp
    #[serde(default = "default_window_size")]
    pub window_size: f64,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn parse_default_duration(value: &str) -> Duration {
    humantime::parse_duration(value).unwrap_or(Duration::from_secs(5))
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_BASE_URL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_COMMENTARY_ENDPOINT.to_string()
}

fn default_connect_timeout() -> Duration {
    parse_default_duration(DEFAULT_CONNECT_TIMEOUT)
}

fn default_update_interval() -> Duration {
    parse_default_duration(DEFAULT_UPDATE_INTERVAL)
}

fn default_tick_interval() -> Duration {
    parse_default_duration(DEFAULT_TICK_INTERVAL)
}

fn default_request_timeout() -> Duration {
    parse_default_duration(DEFAULT_REQUEST_TIMEOUT)
}

fn default_window_size() -> f64 {
    DEFAULT_WINDOW_SIZE
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_interval: default_update_interval(),
            tick_interval: default_tick_interval(),
            request_timeout: default_request_timeout(),
            window_size: default_window_size(),
            history_cap: default_history_cap(),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !UrlUtils::is_http_url(&self.base_url) {
            return Err(AppError::configuration(format!(
                "backend.base_url must be an http(s) URL, got '{}'",
                UrlUtils::obfuscate_credentials(&self.base_url)
            )));
        }
        UrlUtils::endpoint(&self.base_url, &self.endpoint).map_err(|e| {
            AppError::configuration(format!("backend.endpoint '{}' is invalid: {e}", self.endpoint))
        })?;
        Ok(())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.update_interval.is_zero() {
            return Err(AppError::configuration("engine.update_interval must be greater than zero"));
        }
        if self.tick_interval.is_zero() {
            return Err(AppError::configuration("engine.tick_interval must be greater than zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::configuration("engine.request_timeout must be greater than zero"));
        }
        if !self.window_size.is_finite() || self.window_size <= 0.0 {
            return Err(AppError::configuration(format!(
                "engine.window_size must be a positive number of seconds, got {}",
                self.window_size
            )));
        }
        if self.history_cap == 0 {
            return Err(AppError::configuration("engine.history_cap must be at least 1"));
        }
        Ok(())
    }
}

impl Config {
    /// Load from an optional TOML file plus environment
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else {
                warn!("Config file {} not found, using defaults", path.display());
            }
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration to `path` as pretty TOML
    pub fn write_default(path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(&Self::default())
            .map_err(|e| AppError::configuration(e.to_string()))?;
        std::fs::write(path, contents)?;
        info!("Created default config file: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        self.backend.validate()?;
        self.engine.validate()
    }
}
