use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::TimingType;
use crate::error::ProtocolError;

/// A single named instant within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timing {
    pub instant: DateTime<Utc>,
    pub kind: TimingType,
}

impl Timing {
    pub fn new(instant: DateTime<Utc>, kind: TimingType) -> Self {
        Self { instant, kind }
    }

    /// Short `HH:MM` wall-clock rendering in `offset`.
    pub fn time_description(&self, offset: FixedOffset) -> String {
        self.instant.with_timezone(&offset).format("%H:%M").to_string()
    }
}

/// The five timings of one calendar day, stored in category order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDailyTimingSet")]
pub struct DailyTimingSet {
    date: NaiveDate,
    timings: [Timing; 5],
}

impl DailyTimingSet {
    /// Builds a set from timings given in category order.
    pub fn new(date: NaiveDate, timings: [Timing; 5]) -> Result<Self, ProtocolError> {
        for (expected, timing) in TimingType::ALL.into_iter().zip(timings.iter()) {
            if timing.kind != expected {
                return Err(ProtocolError::MisplacedTiming {
                    expected,
                    found: timing.kind,
                });
            }
        }
        Ok(Self { date, timings })
    }

    /// Builds a set from five instants in category order.
    pub fn from_instants(date: NaiveDate, instants: [DateTime<Utc>; 5]) -> Self {
        let timings = TimingType::ALL.map(|kind| Timing::new(instants[kind.index()], kind));
        Self { date, timings }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timing(&self, kind: TimingType) -> Timing {
        self.timings[kind.index()]
    }

    pub fn first(&self) -> Timing {
        self.timing(TimingType::Fajr)
    }

    pub fn last(&self) -> Timing {
        self.timing(TimingType::Isha)
    }

    /// Timings in category order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Timing> + '_ {
        self.timings.iter().copied()
    }

    /// Whether instants are non-decreasing in category order.
    pub fn is_ordered(&self) -> bool {
        self.timings
            .windows(2)
            .all(|pair| pair[0].instant <= pair[1].instant)
    }
}

#[derive(Deserialize)]
struct RawDailyTimingSet {
    date: NaiveDate,
    timings: [Timing; 5],
}

impl TryFrom<RawDailyTimingSet> for DailyTimingSet {
    type Error = ProtocolError;

    fn try_from(raw: RawDailyTimingSet) -> Result<Self, Self::Error> {
        DailyTimingSet::new(raw.date, raw.timings)
    }
}

/// Geographic position handed to calculation methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
