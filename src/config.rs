//! Trainer configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) gives the stock behaviour:
//!
//! ```toml
//! present_intervals = true
//! seed = 42
//!
//! [tone]
//! duration_secs = 0.5
//! gain = 0.3
//! sample_rate = 44100
//!
//! [timing]
//! feedback_revert_ms = 500
//! next_prompt_delay_ms = 1000
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Tone rendering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Length of every rendered tone in seconds
    pub duration_secs: f32,
    /// Peak amplitude (0.0 to 1.0)
    pub gain: f32,
    /// Sample rate for offline rendering; live playback uses the device rate
    pub sample_rate: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            duration_secs: 0.5,
            gain: 0.3,
            sample_rate: 44100,
        }
    }
}

/// Delays for deferred session actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long correct/incorrect feedback shows before reverting to neutral
    pub feedback_revert_ms: u64,
    /// Pause between answering an interval and the next prompt
    pub next_prompt_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            feedback_revert_ms: 500,
            next_prompt_delay_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn feedback_revert(&self) -> Duration {
        Duration::from_millis(self.feedback_revert_ms)
    }

    pub fn next_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.next_prompt_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Play root then target whenever a new interval prompt appears
    pub present_intervals: bool,
    /// Fixed seed for interval prompts (random if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub tone: ToneConfig,
    pub timing: TimingConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            present_intervals: true,
            seed: None,
            tone: ToneConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Parse from TOML content
    pub fn parse(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if that
    /// file exists, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save to a TOML file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// `<config dir>/solfege/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("solfege").join("config.toml"))
}
