use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::TimingType;
use crate::error::ProtocolError;

/// Accepted correction values, in minutes.
pub const CORRECTION_RANGE: RangeInclusive<i32> = -120..=120;

/// Per-category minute offsets applied when a day's timings are generated.
///
/// Categories that were never set read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CorrectionTable", into = "CorrectionTable")]
pub struct Corrections {
    minutes: [i32; 5],
}

impl Corrections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TimingType) -> i32 {
        self.minutes[kind.index()]
    }

    /// Stores `minutes` for `kind`, rejecting values outside [`CORRECTION_RANGE`].
    pub fn set(&mut self, kind: TimingType, minutes: i32) -> Result<(), ProtocolError> {
        if !CORRECTION_RANGE.contains(&minutes) {
            return Err(ProtocolError::CorrectionOutOfRange { kind, minutes });
        }
        self.minutes[kind.index()] = minutes;
        Ok(())
    }

    pub fn with(mut self, kind: TimingType, minutes: i32) -> Result<Self, ProtocolError> {
        self.set(kind, minutes)?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.iter().all(|value| *value == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimingType, i32)> + '_ {
        TimingType::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }
}

/// Human readable correction label; zero has no label.
pub fn correction_description(minutes: i32) -> Option<String> {
    match minutes {
        0 => None,
        value if value > 0 => Some(format!("+{value} Minutes")),
        value => Some(format!("{value} Minutes")),
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CorrectionTable {
    #[serde(default, skip_serializing_if = "is_zero")]
    fajr: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    dhuhr: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    asr: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    maghrib: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    isha: i32,
}

impl TryFrom<CorrectionTable> for Corrections {
    type Error = ProtocolError;

    fn try_from(table: CorrectionTable) -> Result<Self, Self::Error> {
        Corrections::new()
            .with(TimingType::Fajr, table.fajr)?
            .with(TimingType::Dhuhr, table.dhuhr)?
            .with(TimingType::Asr, table.asr)?
            .with(TimingType::Maghrib, table.maghrib)?
            .with(TimingType::Isha, table.isha)
    }
}

impl From<Corrections> for CorrectionTable {
    fn from(corrections: Corrections) -> Self {
        Self {
            fajr: corrections.get(TimingType::Fajr),
            dhuhr: corrections.get(TimingType::Dhuhr),
            asr: corrections.get(TimingType::Asr),
            maghrib: corrections.get(TimingType::Maghrib),
            isha: corrections.get(TimingType::Isha),
        }
    }
}
