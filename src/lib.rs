//! TimingKit: daily timings with per-timing corrections.
//!
//! The workspace is split into several crates, re-exported here:
//!
//! * `protocol`: timing categories, timings, daily sets and corrections
//! * `shared`: errors, configuration, logging and the preferences store
//! * `engine`: calculation methods, day generation, the active/upcoming
//!   selector, widget timelines and the correction picker

pub use timingkit_core as shared;
pub use timingkit_engine as engine;
pub use timingkit_protocol as protocol;

pub use timingkit_core::{Preferences, PreferencesEvent, TimingKitError};
pub use timingkit_engine::{
    DailyTimingGenerator, FixedSchedule, TimelineProvider, TimingSelector, TimingSource,
};
pub use timingkit_protocol::prelude::{
    Corrections, DailyTimingSet, Timing, TimingEntry, TimingType,
};

/// Crate version.
pub const TIMINGKIT_VERSION: &str = env!("CARGO_PKG_VERSION");
