/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempo_analytics::{AnalyticsConfig, DEFAULT_TIMEOUT_SECS};
use tempo_playback::PlayerConfig;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tempo.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_analytics")]
    pub analytics: AnalyticsSettings,

    #[serde(default = "default_simulation")]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length reported for every track by the simulated backend
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: f64,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tempo.toml` is read if
    /// present. `TEMPO_`-prefixed variables override both, with `__`
    /// between nesting levels (`TEMPO_PLAYER__VOLUME=0.5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TEMPO")
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
        let volume = self.player.volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "player.volume must be between 0 and 1, got {}",
                volume
            )));
        }

        if self.player.history_limit == 0 {
            return Err(CliError::Config(
                "player.history_limit must be at least 1".to_string(),
            ));
        }

        let duration = self.simulation.default_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CliError::Config(format!(
                "simulation.default_duration_secs must be positive, got {}",
                duration
            )));
        }

        if self.analytics.enabled {
            let url = &self.analytics.base_url;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CliError::Config(format!(
                    "analytics.base_url must be an http(s) URL, got {:?}",
                    url
                )));
            }

            if self.analytics.timeout_secs == 0 {
                return Err(CliError::Config(
                    "analytics.timeout_secs must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Settings for the play-history client
    pub fn analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            base_url: self.analytics.base_url.clone(),
            access_token: self.analytics.access_token.clone(),
            timeout_secs: self.analytics.timeout_secs,
        }
    }
}

// Default values
fn default_analytics() -> AnalyticsSettings {
    AnalyticsSettings {
        enabled: false,
        base_url: default_base_url(),
        access_token: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_simulation() -> SimulationSettings {
    SimulationSettings {
        default_duration_secs: default_duration_secs(),
    }
}

fn default_duration_secs() -> f64 {
    180.0
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        default_analytics()
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        default_simulation()
    }
}
