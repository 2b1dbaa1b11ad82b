use std::io;

use thiserror::Error;
use timingkit_protocol::ProtocolError;

/// Result type used across the TimingKit core crate.
pub type Result<T> = std::result::Result<T, TimingKitError>;

/// Canonical error representation shared by the TimingKit crates.
#[derive(Debug, Error)]
pub enum TimingKitError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("invalid correction: {0}")]
    InvalidCorrection(#[from] ProtocolError),

    #[error("preferences error: {0}")]
    PreferencesError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

impl From<toml::de::Error> for TimingKitError {
    fn from(err: toml::de::Error) -> Self {
        TimingKitError::DeserializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for TimingKitError {
    fn from(err: toml::ser::Error) -> Self {
        TimingKitError::SerializationError(err.to_string())
    }
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidEnvVar { key: String, value: String },

    #[error("home directory could not be determined")]
    NoHomeDir,
}
