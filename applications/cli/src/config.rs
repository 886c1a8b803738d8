/// CLI configuration
use crate::error::{CliError, Result};
use cadence_client::ClientConfig;
use cadence_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default = "default_volume")]
    pub default_volume: f32,

    #[serde(default = "default_autoload")]
    pub autoload_first_track: bool,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `cadence.toml` is optional.
    /// Environment variables prefixed with `CADENCE_` override the file, with
    /// `__` between section and key (`CADENCE_API__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(CliError::Config(
                "API URL is required (set CADENCE_API__URL)".to_string(),
            ));
        }

        if self.session.tick_interval_ms == 0 {
            return Err(CliError::Config(
                "session.tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Controller settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            history_size: self.session.history_size,
            default_volume: self.session.default_volume,
            autoload_first_track: self.session.autoload_first_track,
            ..SessionConfig::default()
        }
    }

    /// HTTP client settings, with the stored token if any
    pub fn client_config(&self, token: Option<&str>) -> ClientConfig {
        let config = ClientConfig::new(self.api.url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs));
        match token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    /// Progress refresh cadence
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.session.tick_interval_ms)
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_session() -> SessionSettings {
    SessionSettings {
        store_path: default_store_path(),
        history_size: default_history_size(),
        default_volume: default_volume(),
        autoload_first_track: default_autoload(),
        tick_interval_ms: default_tick_interval_ms(),
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("cadence-session.redb")
}

fn default_history_size() -> usize {
    20
}

fn default_volume() -> f32 {
    0.7
}

fn default_autoload() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            session: default_session(),
        }
    }
}
