//! Core shared library for TimingKit.
//!
//! This crate exposes the ambient pieces every front-end depends on:
//! the common error type, configuration loading, logging setup, JSON
//! helpers and the correction preferences store.

pub mod config;
pub mod errors;
pub mod logging;
pub mod preferences;
pub mod serde_utils;

pub use config::CoreConfig;
pub use errors::{Result as CoreResult, TimingKitError};
pub use preferences::{Preferences, PreferencesChange, PreferencesEvent};
