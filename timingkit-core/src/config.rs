use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::FixedOffset;
use timingkit_protocol::prelude::Coordinate;

use crate::errors::ConfigError;

/// Configuration shared by TimingKit front-ends.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub preferences_path: PathBuf,
    /// Offset from UTC, in minutes, that defines calendar days. `None` means local time.
    pub utc_offset_minutes: Option<i32>,
    pub coordinate: Coordinate,
    pub log_level: Option<String>,
}

impl CoreConfig {
    /// Loads configuration from the process environment (`TIMINGKIT_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("TIMINGKIT_")
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `WIDGET_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let preferences_path = match env::var(key("PREFERENCES")) {
            Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw),
            _ => default_preferences_path()?,
        };

        let utc_offset_minutes = parse_optional::<i32>(&key("UTC_OFFSET"))?;
        if let Some(minutes) = utc_offset_minutes {
            if offset_from_minutes(minutes).is_none() {
                return Err(ConfigError::InvalidEnvVar {
                    key: key("UTC_OFFSET"),
                    value: minutes.to_string(),
                });
            }
        }

        let latitude = parse_optional::<f64>(&key("LATITUDE"))?.unwrap_or_default();
        let longitude = parse_optional::<f64>(&key("LONGITUDE"))?.unwrap_or_default();
        let log_level = env::var(key("LOG_LEVEL")).ok();

        Ok(Self {
            preferences_path,
            utc_offset_minutes,
            coordinate: Coordinate::new(latitude, longitude),
            log_level,
        })
    }

    /// The configured fixed offset, if any.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes.and_then(offset_from_minutes)
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// `$HOME/.timingkit/preferences.toml`.
pub fn default_preferences_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    path.push(".timingkit");
    path.push("preferences.toml");
    Ok(path)
}

fn parse_optional<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
