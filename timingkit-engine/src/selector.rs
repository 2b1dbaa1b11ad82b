use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use timingkit_protocol::prelude::{DailyTimingSet, Timing, TimingEntry, TimingType};

use crate::generator::TimingSource;

/// Finds the active and upcoming timing around a reference instant.
///
/// "Today" is the calendar date of the reference instant in `offset`. A
/// timing whose instant equals the reference instant has occurred. Each query
/// reads today's set and both adjacent days from the source, so timings a
/// method or a correction pushes across midnight still bracket the reference.
/// When no timing of today has occurred the answer is yesterday's isha, and
/// once all of them have it is tomorrow's fajr.
///
/// At the ends of the representable calendar the missing neighbour is
/// replaced by an isha pinned to `DateTime::<Utc>::MIN_UTC` or a fajr pinned
/// to `DateTime::<Utc>::MAX_UTC`.
#[derive(Debug, Clone)]
pub struct TimingSelector<S> {
    source: S,
    offset: FixedOffset,
}

impl<S: TimingSource> TimingSelector<S> {
    pub fn new(source: S, offset: FixedOffset) -> Self {
        Self { source, offset }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `at` in the selector's offset, saturating at the
    /// ends of the calendar.
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        let shift = self.offset.local_minus_utc();
        at.naive_utc()
            .checked_add_signed(Duration::seconds(shift as i64))
            .map(|local| local.date())
            .unwrap_or(if shift > 0 { NaiveDate::MAX } else { NaiveDate::MIN })
    }

    /// Latest timing at or before `at`; yesterday's isha before today's fajr.
    pub fn active_timing(&self, at: DateTime<Utc>) -> Timing {
        self.window(at).active(at)
    }

    /// Earliest timing after `at`; tomorrow's fajr once today's isha passed.
    pub fn upcoming_timing(&self, at: DateTime<Utc>) -> Timing {
        self.window(at).upcoming(at)
    }

    /// Active and upcoming timing as one widget entry.
    pub fn entry(&self, at: DateTime<Utc>) -> TimingEntry {
        let window = self.window(at);
        TimingEntry::new(window.active(at), window.upcoming(at))
    }

    fn window(&self, at: DateTime<Utc>) -> Window {
        let date = self.date_of(at);
        Window {
            yesterday: date.pred_opt().map(|day| self.source.daily_timings(day)),
            today: self.source.daily_timings(date),
            tomorrow: date.succ_opt().map(|day| self.source.daily_timings(day)),
        }
    }
}

/// Three consecutive days around a reference date.
struct Window {
    yesterday: Option<DailyTimingSet>,
    today: DailyTimingSet,
    tomorrow: Option<DailyTimingSet>,
}

impl Window {
    fn timings(&self) -> impl Iterator<Item = Timing> + '_ {
        self.yesterday
            .iter()
            .chain(Some(&self.today))
            .chain(self.tomorrow.iter())
            .flat_map(|day| day.iter())
    }

    fn active(&self, at: DateTime<Utc>) -> Timing {
        // on equal instants the later slot wins
        let latest = self
            .timings()
            .filter(|timing| timing.instant <= at)
            .fold(None, |best: Option<Timing>, timing| match best {
                Some(best) if best.instant > timing.instant => Some(best),
                _ => Some(timing),
            });
        latest.unwrap_or_else(|| match &self.yesterday {
            Some(yesterday) => yesterday.last(),
            None => Timing::new(DateTime::<Utc>::MIN_UTC, TimingType::Isha),
        })
    }

    fn upcoming(&self, at: DateTime<Utc>) -> Timing {
        let earliest = self
            .timings()
            .filter(|timing| timing.instant > at)
            .fold(None, |best: Option<Timing>, timing| match best {
                Some(best) if best.instant <= timing.instant => Some(best),
                _ => Some(timing),
            });
        earliest.unwrap_or_else(|| match &self.tomorrow {
            Some(tomorrow) => tomorrow.first(),
            None => Timing::new(DateTime::<Utc>::MAX_UTC, TimingType::Fajr),
        })
    }
}
