use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use timingkit_protocol::prelude::{Coordinate, TimingType};

use crate::error::EngineError;

/// Source of a day's uncorrected wall-clock times.
///
/// Implementations must be deterministic for a given date and coordinate.
/// Astronomical methods plug in here; the two provided ones are
/// configuration driven.
pub trait CalculationMethod: Send + Sync {
    /// Local wall-clock times in category order (fajr first).
    fn base_times(&self, date: NaiveDate, coordinate: Coordinate) -> [NaiveDateTime; 5];

    fn name(&self) -> &'static str;
}

impl<M: CalculationMethod + ?Sized> CalculationMethod for Box<M> {
    fn base_times(&self, date: NaiveDate, coordinate: Coordinate) -> [NaiveDateTime; 5] {
        (**self).base_times(date, coordinate)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The same five wall-clock times every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchedule {
    times: [NaiveTime; 5],
}

impl FixedSchedule {
    pub fn new(times: [NaiveTime; 5]) -> Result<Self, EngineError> {
        if let Some(pair) = times.windows(2).find(|pair| pair[0] > pair[1]) {
            return Err(EngineError::InvalidSchedule(format!(
                "times must not decrease ({} after {})",
                pair[1], pair[0]
            )));
        }
        Ok(Self { times })
    }

    /// Parses five `HH:MM` values in category order.
    pub fn parse(raw: [&str; 5]) -> Result<Self, EngineError> {
        let mut times = [NaiveTime::MIN; 5];
        for (slot, value) in times.iter_mut().zip(raw) {
            *slot = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|err| {
                EngineError::InvalidSchedule(format!("cannot parse '{value}': {err}"))
            })?;
        }
        Self::new(times)
    }

    pub fn time(&self, kind: TimingType) -> NaiveTime {
        self.times[kind.index()]
    }
}

impl Default for FixedSchedule {
    fn default() -> Self {
        let hm = |hour, minute| NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        Self {
            times: [hm(5, 0), hm(12, 0), hm(15, 30), hm(18, 0), hm(19, 30)],
        }
    }
}

impl CalculationMethod for FixedSchedule {
    fn base_times(&self, date: NaiveDate, _coordinate: Coordinate) -> [NaiveDateTime; 5] {
        self.times.map(|time| date.and_time(time))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Evenly spaced timings: fajr one interval after `anchor`, each following
/// timing one interval after the previous one.
///
/// Useful for demos and for watching a widget timeline roll over quickly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSchedule {
    anchor: NaiveTime,
    interval: Duration,
}

impl IntervalSchedule {
    pub const DEFAULT_INTERVAL_SECS: i64 = 60;
    /// Longest accepted interval; five of them stay within a few days.
    pub const MAX_INTERVAL_SECS: i64 = 24 * 60 * 60;

    pub fn new(anchor: NaiveTime, interval: Duration) -> Result<Self, EngineError> {
        if interval < Duration::zero() {
            return Err(EngineError::InvalidSchedule(
                "interval must not be negative".into(),
            ));
        }
        if interval > Duration::seconds(Self::MAX_INTERVAL_SECS) {
            return Err(EngineError::InvalidSchedule(format!(
                "interval must not exceed {} seconds",
                Self::MAX_INTERVAL_SECS
            )));
        }
        Ok(Self { anchor, interval })
    }

    pub fn with_anchor(anchor: NaiveTime) -> Self {
        Self {
            anchor,
            interval: Duration::seconds(Self::DEFAULT_INTERVAL_SECS),
        }
    }
}

impl CalculationMethod for IntervalSchedule {
    fn base_times(&self, date: NaiveDate, _coordinate: Coordinate) -> [NaiveDateTime; 5] {
        let start = date.and_time(self.anchor);
        TimingType::ALL.map(|kind| {
            let offset = self.interval * (kind.index() as i32 + 1);
            start
                .checked_add_signed(offset)
                .unwrap_or(NaiveDateTime::MAX)
        })
    }

    fn name(&self) -> &'static str {
        "interval"
    }
}
