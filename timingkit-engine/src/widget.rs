use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use timingkit_protocol::prelude::TimingEntry;
use tracing::{debug, info};

use crate::generator::TimingSource;
use crate::selector::TimingSelector;

/// When a consumer should ask for a fresh timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// After the last entry's date has been reached.
    AtEnd,
    Never,
}

/// Entries a widget steps through, in date order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetTimeline {
    pub entries: Vec<TimingEntry>,
    pub policy: ReloadPolicy,
}

impl WidgetTimeline {
    /// Instant after which the timeline should be rebuilt.
    pub fn reload_at(&self) -> Option<DateTime<Utc>> {
        match self.policy {
            ReloadPolicy::AtEnd => self.entries.last().map(TimingEntry::date),
            ReloadPolicy::Never => None,
        }
    }

    /// The entry a widget shows at `at`: the latest one already due.
    pub fn entry_at(&self, at: DateTime<Utc>) -> Option<&TimingEntry> {
        self.entries.iter().rev().find(|entry| entry.date() <= at)
    }
}

/// Shared invalidation counter. Clones observe the same generation, so a
/// preferences listener can hold one while the provider is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct ReloadHandle {
    generation: Arc<AtomicU64>,
}

impl ReloadHandle {
    /// Invalidates every previously built timeline.
    pub fn reload_all(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, "widget timelines invalidated");
        generation
    }

    /// Number of times timelines were invalidated.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Builds widget entries from a [`TimingSelector`].
#[derive(Debug)]
pub struct TimelineProvider<S> {
    selector: TimingSelector<S>,
    entry_count: usize,
    reload: ReloadHandle,
}

impl<S: TimingSource> TimelineProvider<S> {
    pub const DEFAULT_ENTRY_COUNT: usize = 6;

    pub fn new(selector: TimingSelector<S>) -> Self {
        Self {
            selector,
            entry_count: Self::DEFAULT_ENTRY_COUNT,
            reload: ReloadHandle::default(),
        }
    }

    /// Shares an existing invalidation counter.
    pub fn with_reload_handle(mut self, reload: ReloadHandle) -> Self {
        self.reload = reload;
        self
    }

    pub fn reload_handle(&self) -> ReloadHandle {
        self.reload.clone()
    }

    pub fn with_entry_count(mut self, entry_count: usize) -> Self {
        self.entry_count = entry_count;
        self
    }

    pub fn selector(&self) -> &TimingSelector<S> {
        &self.selector
    }

    /// Entry shown while the widget has no data yet.
    pub fn placeholder(&self, at: DateTime<Utc>) -> TimingEntry {
        self.selector.entry(at)
    }

    /// Entry for a transient presentation of the widget.
    pub fn snapshot(&self, at: DateTime<Utc>) -> TimingEntry {
        self.selector.entry(at)
    }

    /// Chained entries starting from the timing active at `at`.
    ///
    /// Each entry after the first starts at the previous entry's next timing.
    pub fn timeline(&self, at: DateTime<Utc>) -> WidgetTimeline {
        self.timeline_with_count(at, self.entry_count)
    }

    /// Like [`TimelineProvider::timeline`] with an explicit entry count.
    pub fn timeline_with_count(&self, at: DateTime<Utc>, count: usize) -> WidgetTimeline {
        let mut entries: Vec<TimingEntry> = Vec::with_capacity(count);
        for _ in 0..count {
            let current = match entries.last() {
                Some(previous) => previous.next,
                None => self.selector.active_timing(at),
            };
            let next = self.selector.upcoming_timing(current.instant);
            entries.push(TimingEntry::new(current, next));
        }

        debug!(
            entries = entries.len(),
            generation = self.generation(),
            "built widget timeline"
        );
        WidgetTimeline {
            entries,
            policy: ReloadPolicy::AtEnd,
        }
    }

    pub fn reload_all(&self) -> u64 {
        self.reload.reload_all()
    }

    pub fn generation(&self) -> u64 {
        self.reload.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{FixedSchedule, IntervalSchedule};
    use crate::generator::DailyTimingGenerator;
    use chrono::{FixedOffset, NaiveTime, TimeZone};
    use timingkit_protocol::prelude::TimingType;

    fn provider() -> TimelineProvider<DailyTimingGenerator<FixedSchedule>> {
        let utc = FixedOffset::east_opt(0).unwrap();
        TimelineProvider::new(TimingSelector::new(
            DailyTimingGenerator::new(FixedSchedule::default(), utc),
            utc,
        ))
    }

    #[test]
    fn timeline_chains_entries_across_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap();
        let timeline = provider().timeline(at);

        let kinds: Vec<TimingType> = timeline.entries.iter().map(|entry| entry.current.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TimingType::Asr,
                TimingType::Maghrib,
                TimingType::Isha,
                TimingType::Fajr,
                TimingType::Dhuhr,
                TimingType::Asr,
            ]
        );
        for pair in timeline.entries.windows(2) {
            assert_eq!(pair[0].next, pair[1].current);
        }
        assert_eq!(
            timeline.reload_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 11, 15, 30, 0).unwrap())
        );
    }

    #[test]
    fn entry_at_picks_latest_due_entry() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 13, 0, 0).unwrap();
        let timeline = provider().timeline(at);

        let evening = Utc.with_ymd_and_hms(2024, 3, 10, 18, 5, 0).unwrap();
        let shown = timeline.entry_at(evening).expect("entry due");
        assert_eq!(shown.current.kind, TimingType::Maghrib);
        assert_eq!(shown.next.kind, TimingType::Isha);

        let before = Utc.with_ymd_and_hms(2024, 3, 10, 11, 0, 0).unwrap();
        assert!(timeline.entry_at(before).is_none());
    }

    #[test]
    fn snapshot_matches_selector_and_reload_bumps_generation() {
        let provider = provider().with_entry_count(2);
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 4, 0, 0).unwrap();

        let snapshot = provider.snapshot(at);
        assert_eq!(snapshot, provider.placeholder(at));
        assert_eq!(snapshot.current.kind, TimingType::Isha);
        assert_eq!(snapshot.next.kind, TimingType::Fajr);
        assert_eq!(provider.timeline(at).entries.len(), 2);

        assert_eq!(provider.generation(), 0);
        assert_eq!(provider.reload_all(), 1);
        assert_eq!(provider.generation(), 1);
    }

    #[test]
    fn rebuilt_provider_keeps_shared_generation() {
        let first = provider();
        let handle = first.reload_handle();
        handle.reload_all();

        let second = provider().with_reload_handle(first.reload_handle());
        assert_eq!(second.generation(), 1);
        second.reload_all();
        assert_eq!(handle.generation(), 2);
    }

    #[test]
    fn timeline_keeps_every_timing_across_midnight() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let anchor = NaiveTime::from_hms_opt(23, 57, 0).unwrap();
        let provider = TimelineProvider::new(TimingSelector::new(
            DailyTimingGenerator::new(IntervalSchedule::with_anchor(anchor), utc),
            utc,
        ));

        let at = Utc.with_ymd_and_hms(2024, 3, 10, 23, 58, 30).unwrap();
        let timeline = provider.timeline(at);
        let kinds: Vec<TimingType> = timeline.entries.iter().map(|entry| entry.current.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TimingType::Fajr,
                TimingType::Dhuhr,
                TimingType::Asr,
                TimingType::Maghrib,
                TimingType::Isha,
                TimingType::Fajr,
            ]
        );
        assert_eq!(
            timeline.entries[4].current.instant,
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 2, 0).unwrap()
        );
        assert_eq!(
            timeline.entries[5].current.instant,
            Utc.with_ymd_and_hms(2024, 3, 11, 23, 58, 0).unwrap()
        );
    }
}
