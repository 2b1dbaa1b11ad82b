use crate::errors::{Result, TimingKitError};

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| TimingKitError::SerializationError(err.to_string()))
}

/// Serializes a value to a TOML document.
pub fn to_toml_string<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(toml::to_string_pretty(value)?)
}

/// Deserializes a TOML document.
pub fn from_toml_str<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    Ok(toml::from_str(input)?)
}
