use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use timingkit_protocol::prelude::{Coordinate, Corrections, DailyTimingSet, TimingType};
use tracing::{trace, warn};

use crate::calculation::CalculationMethod;

/// Produces the timings of any calendar day. Must be total and deterministic.
pub trait TimingSource {
    fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet;
}

impl<S: TimingSource + ?Sized> TimingSource for &S {
    fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet {
        (**self).daily_timings(date)
    }
}

impl<S: TimingSource + ?Sized> TimingSource for Box<S> {
    fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet {
        (**self).daily_timings(date)
    }
}

/// [`TimingSource`] backed by a closure, see [`from_fn`].
#[derive(Clone)]
pub struct FnSource<F> {
    f: F,
}

/// Wraps a closure mapping a date to its timings.
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(NaiveDate) -> DailyTimingSet,
{
    FnSource { f }
}

impl<F> TimingSource for FnSource<F>
where
    F: Fn(NaiveDate) -> DailyTimingSet,
{
    fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet {
        (self.f)(date)
    }
}

/// Applies a correction map to a calculation method's base times.
///
/// Each category is shifted by its own correction only; base times are read
/// as wall-clock times in `offset`.
#[derive(Debug, Clone)]
pub struct DailyTimingGenerator<M> {
    method: M,
    corrections: Corrections,
    offset: FixedOffset,
    coordinate: Coordinate,
}

impl<M: CalculationMethod> DailyTimingGenerator<M> {
    pub fn new(method: M, offset: FixedOffset) -> Self {
        Self {
            method,
            corrections: Corrections::default(),
            offset,
            coordinate: Coordinate::default(),
        }
    }

    pub fn with_corrections(mut self, corrections: Corrections) -> Self {
        self.corrections = corrections;
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = coordinate;
        self
    }

    /// Swaps in a new correction map, e.g. after the preferences changed.
    pub fn set_corrections(&mut self, corrections: Corrections) {
        self.corrections = corrections;
    }

    pub fn corrections(&self) -> Corrections {
        self.corrections
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn method(&self) -> &M {
        &self.method
    }

    /// Reads `local` in the generator's offset, saturating at the ends of
    /// the calendar.
    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let shift = self.offset.local_minus_utc();
        let utc = local
            .checked_sub_signed(Duration::seconds(shift as i64))
            .unwrap_or(if shift > 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            });
        Utc.from_utc_datetime(&utc)
    }
}

fn shift_saturating(instant: DateTime<Utc>, minutes: i32) -> DateTime<Utc> {
    instant
        .checked_add_signed(Duration::minutes(minutes as i64))
        .unwrap_or(if minutes < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

impl<M: CalculationMethod> TimingSource for DailyTimingGenerator<M> {
    fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet {
        let base = self.method.base_times(date, self.coordinate);
        let instants = base.map(|local| self.to_utc(local));
        let corrected = TimingType::ALL
            .map(|kind| shift_saturating(instants[kind.index()], self.corrections.get(kind)));

        let set = DailyTimingSet::from_instants(date, corrected);
        if !set.is_ordered() {
            warn!(
                %date,
                method = self.method.name(),
                corrections = ?self.corrections,
                "corrections leave timings out of order"
            );
        }
        trace!(%date, method = self.method.name(), "generated daily timings");
        set
    }
}
