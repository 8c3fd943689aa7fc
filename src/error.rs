//! Error types
//!
//! None of these are fatal. Trainer errors are absorbed at the public API
//! (the request becomes a no-op), audio errors put the synthesizer into its
//! silent mode, and config errors are reported by the binary.

use std::fmt;

/// Reasons a training request is ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerError {
    /// A start request arrived before both root and mode were chosen
    ConfigurationIncomplete,
    /// An answer arrived with no active dictation phase or no open prompt
    InactivePrompt,
    /// The session is finished and read-only until reset
    SessionFinished,
    /// Configuration can only change before a session starts
    NotConfigurable,
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerError::ConfigurationIncomplete => {
                write!(f, "Root pitch and scale mode must both be selected")
            }
            TrainerError::InactivePrompt => write!(f, "No prompt is awaiting an answer"),
            TrainerError::SessionFinished => write!(f, "Session is finished"),
            TrainerError::NotConfigurable => {
                write!(f, "Configuration is locked while a session is active")
            }
        }
    }
}

impl std::error::Error for TrainerError {}

/// Result type for trainer operations
pub type TrainerResult<T> = Result<T, TrainerError>;

/// Audio output setup errors
#[derive(Debug)]
pub enum AudioError {
    /// Host has no default output device
    NoOutputDevice,
    /// Device sample format we cannot write
    UnsupportedFormat(String),
    /// Device query failed
    Device(String),
    /// Stream could not be built or started
    Stream(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "No audio output device found"),
            AudioError::UnsupportedFormat(format) => {
                write!(f, "Unsupported sample format: {}", format)
            }
            AudioError::Device(msg) => write!(f, "Audio device error: {}", msg),
            AudioError::Stream(msg) => write!(f, "Audio stream error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

impl From<cpal::DeviceNameError> for AudioError {
    fn from(e: cpal::DeviceNameError) -> Self {
        AudioError::Device(e.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        AudioError::Device(e.to_string())
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(e: cpal::BuildStreamError) -> Self {
        AudioError::Stream(e.to_string())
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(e: cpal::PlayStreamError) -> Self {
        AudioError::Stream(e.to_string())
    }
}

/// Result type for audio setup
pub type AudioResult<T> = Result<T, AudioError>;

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config file is not valid TOML for our schema
    Parse(String),
    /// Config could not be written out as TOML
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Could not serialize config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Result type for config loading
pub type ConfigResult<T> = Result<T, ConfigError>;
