// Fuzz target checking active/upcoming selection for arbitrary corrections,
// offsets and reference instants.
#![no_main]

use chrono::{DateTime, FixedOffset, Utc};
use libfuzzer_sys::fuzz_target;
use timingkit_engine::{DailyTimingGenerator, FixedSchedule, TimingSelector, TimingSource};
use timingkit_protocol::prelude::{Corrections, TimingType, CORRECTION_RANGE};

fuzz_target!(|data: &[u8]| {
    if data.len() < 11 {
        return;
    }

    let mut corrections = Corrections::new();
    for (kind, byte) in TimingType::ALL.into_iter().zip(&data[..5]) {
        let minutes = (*byte as i32 - 128).clamp(*CORRECTION_RANGE.start(), *CORRECTION_RANGE.end());
        if corrections.set(kind, minutes).is_err() {
            return;
        }
    }

    let offset_minutes = i16::from_le_bytes([data[5], data[6]]) as i32 % (14 * 60);
    let Some(offset) = FixedOffset::east_opt(offset_minutes * 60) else {
        return;
    };
    // u32 seconds keep the reference between 1970 and 2106.
    let seconds = u32::from_le_bytes([data[7], data[8], data[9], data[10]]) as i64;
    let Some(at) = DateTime::<Utc>::from_timestamp(seconds, 0) else {
        return;
    };

    let generator = DailyTimingGenerator::new(FixedSchedule::default(), offset)
        .with_corrections(corrections);
    let selector = TimingSelector::new(generator, offset);

    let entry = selector.entry(at);
    assert!(entry.current.instant <= at);
    assert!(at < entry.next.instant);

    let day = selector.source().daily_timings(selector.date_of(at));
    if !day.is_ordered() {
        return;
    }
    if at < day.first().instant {
        assert_eq!(entry.current.kind, TimingType::Isha);
    }
    if at >= day.last().instant {
        assert_eq!(entry.next.kind, TimingType::Fajr);
    }
});
