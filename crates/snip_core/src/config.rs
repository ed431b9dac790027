//! Settings with TOML-based sections.
//!
//! Every field has a serde default so a partial file, or no file at all,
//! yields a usable configuration. The tool never writes its config back.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Encoder output parameters.
    #[serde(default)]
    pub encode: EncodeSettings,

    /// Loudness normalization parameters.
    #[serde(default)]
    pub loudness: LoudnessSettings,
}

/// Encoder output parameters for extracted tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Audio bitrate passed to the encoder (e.g. "320k").
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_bitrate() -> String {
    "320k".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            bitrate: default_bitrate(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// Loudness normalization targets and measurement bounds.
///
/// The targets are used identically in the measurement pass and the
/// per-track correction pass; the windows only bound how much material the
/// measurement pass samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoudnessSettings {
    /// Integrated loudness target in LUFS.
    #[serde(default = "default_integrated")]
    pub integrated: f64,

    /// Loudness range target in LU.
    #[serde(default = "default_range")]
    pub range: f64,

    /// True peak target in dBTP.
    #[serde(default = "default_true_peak")]
    pub true_peak: f64,

    /// How many seconds of media the measurement pass samples.
    #[serde(default = "default_analysis_window")]
    pub analysis_window_secs: u64,

    /// Measurement window when simulating, kept short so dry runs stay
    /// fast.
    #[serde(default = "default_simulate_window")]
    pub simulate_window_secs: u64,
}

fn default_integrated() -> f64 {
    -6.0
}

fn default_range() -> f64 {
    4.5
}

fn default_true_peak() -> f64 {
    -2.0
}

fn default_analysis_window() -> u64 {
    300
}

fn default_simulate_window() -> u64 {
    5
}

impl Default for LoudnessSettings {
    fn default() -> Self {
        Self {
            integrated: default_integrated(),
            range: default_range(),
            true_peak: default_true_peak(),
            analysis_window_secs: default_analysis_window(),
            simulate_window_secs: default_simulate_window(),
        }
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Type alias for config operation results.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings from an optional TOML file, falling back to defaults
    /// when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
