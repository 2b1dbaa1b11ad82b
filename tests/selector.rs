// Active/upcoming selection against a mocked day source and the real generator.
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use mockall::mock;
use mockall::predicate::eq;
use test_case::test_case;
use timingkit::engine::IntervalSchedule;
use timingkit::{
    Corrections, DailyTimingGenerator, DailyTimingSet, FixedSchedule, TimingSelector,
    TimingSource, TimingType,
};

mock! {
    pub Source {}

    impl TimingSource for Source {
        fn daily_timings(&self, date: NaiveDate) -> DailyTimingSet;
    }
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("offset")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("date")
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

/// 05:00, 12:00, 15:30, 18:00, 19:30 UTC on `date`.
fn sample_day(date: NaiveDate) -> DailyTimingSet {
    let time = |hour, minute| date.and_hms_opt(hour, minute, 0).unwrap().and_utc();
    DailyTimingSet::from_instants(
        date,
        [time(5, 0), time(12, 0), time(15, 30), time(18, 0), time(19, 30)],
    )
}

/// Expects exactly one generation of each listed date.
fn source_for(dates: &[NaiveDate]) -> MockSource {
    let mut source = MockSource::new();
    for date in dates {
        source
            .expect_daily_timings()
            .with(eq(*date))
            .times(1)
            .returning(sample_day);
    }
    source
}

#[test]
fn an_entry_generates_each_neighbouring_day_once() {
    let selector = TimingSelector::new(source_for(&[date(9), date(10), date(11)]), utc());
    let entry = selector.entry(at(10, 13, 0));
    assert_eq!(entry.current.kind, TimingType::Dhuhr);
    assert_eq!(entry.next.kind, TimingType::Asr);
}

#[test]
fn before_fajr_the_answer_is_yesterdays_isha() {
    let selector = TimingSelector::new(source_for(&[date(9), date(10), date(11)]), utc());
    let active = selector.active_timing(at(10, 4, 0));
    assert_eq!(active.kind, TimingType::Isha);
    assert_eq!(active.instant, at(9, 19, 30));
}

#[test]
fn after_isha_the_answer_is_tomorrows_fajr() {
    let selector = TimingSelector::new(source_for(&[date(9), date(10), date(11)]), utc());
    let upcoming = selector.upcoming_timing(at(10, 20, 0));
    assert_eq!(upcoming.kind, TimingType::Fajr);
    assert_eq!(upcoming.instant, at(11, 5, 0));
}

#[test]
fn the_first_calendar_day_has_no_yesterday() {
    let first = NaiveDate::MIN;
    let second = first.succ_opt().expect("second day");
    let selector = TimingSelector::new(source_for(&[first, second]), utc());

    let earliest = DateTime::<Utc>::MIN_UTC;
    let active = selector.active_timing(earliest);
    assert_eq!(active.kind, TimingType::Isha);
    assert_eq!(active.instant, earliest);
}

#[test_case(at(10, 13, 0), TimingType::Dhuhr, TimingType::Asr ; "afternoon")]
#[test_case(at(10, 12, 0), TimingType::Dhuhr, TimingType::Asr ; "exactly dhuhr")]
#[test_case(at(10, 4, 0), TimingType::Isha, TimingType::Fajr ; "before fajr")]
#[test_case(at(10, 20, 0), TimingType::Isha, TimingType::Fajr ; "after isha")]
#[test_case(at(10, 17, 59), TimingType::Asr, TimingType::Maghrib ; "before maghrib")]
fn closure_sources_follow_the_examples(
    reference: DateTime<Utc>,
    active: TimingType,
    upcoming: TimingType,
) {
    let selector = TimingSelector::new(timingkit::engine::from_fn(sample_day), utc());
    let entry = selector.entry(reference);
    assert_eq!(entry.current.kind, active);
    assert_eq!(entry.next.kind, upcoming);
}

#[test_case(Corrections::new() ; "no corrections")]
#[test_case(Corrections::new().with(TimingType::Fajr, -120).unwrap().with(TimingType::Isha, 120).unwrap() ; "stretched day")]
#[test_case(Corrections::new().with(TimingType::Dhuhr, 45).unwrap().with(TimingType::Asr, -45).unwrap() ; "squeezed afternoon")]
fn active_and_upcoming_partition_the_timeline(corrections: Corrections) {
    let generator =
        DailyTimingGenerator::new(FixedSchedule::default(), utc()).with_corrections(corrections);
    let selector = TimingSelector::new(generator, utc());

    let mut reference = at(9, 0, 0);
    while reference < at(12, 0, 0) {
        let active = selector.active_timing(reference);
        let upcoming = selector.upcoming_timing(reference);
        assert!(active.instant <= reference, "active after {reference}");
        assert!(reference < upcoming.instant, "upcoming not after {reference}");
        reference += Duration::minutes(7);
    }
}

#[test]
fn generated_days_are_ordered_all_year() {
    let corrections = Corrections::new()
        .with(TimingType::Fajr, 20)
        .unwrap()
        .with(TimingType::Maghrib, -20)
        .unwrap();
    let offset = FixedOffset::west_opt(5 * 3600).expect("offset");
    let generator = DailyTimingGenerator::new(FixedSchedule::default(), offset)
        .with_corrections(corrections);

    let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    while day.year() == 2024 {
        let set = generator.daily_timings(day);
        assert!(set.is_ordered(), "{day}");
        assert_eq!(set.date(), day);
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn offset_moves_the_day_boundary() {
    let minus_five = FixedOffset::west_opt(5 * 3600).expect("offset");
    let selector = TimingSelector::new(
        DailyTimingGenerator::new(FixedSchedule::default(), minus_five),
        minus_five,
    );

    // 03:00 UTC on the 10th is 22:00 on the 9th at -05:00: after isha there
    let reference = at(10, 3, 0);
    let upcoming = selector.upcoming_timing(reference);
    assert_eq!(upcoming.kind, TimingType::Fajr);
    assert_eq!(upcoming.instant, at(10, 10, 0));
    assert_eq!(selector.active_timing(reference).instant, at(10, 0, 30));
}

#[test_case(23, 57 ; "spills past midnight")]
#[test_case(0, 0 ; "starts at midnight")]
#[test_case(12, 0 ; "midday")]
fn interval_schedules_partition_the_timeline(hour: u32, minute: u32) {
    let anchor = chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
    let generator = DailyTimingGenerator::new(IntervalSchedule::with_anchor(anchor), utc());
    let selector = TimingSelector::new(generator, utc());

    let mut reference = at(9, 23, 0);
    while reference < at(11, 1, 0) {
        let entry = selector.entry(reference);
        assert!(entry.current.instant <= reference, "active after {reference}");
        assert!(reference < entry.next.instant, "upcoming not after {reference}");
        reference += Duration::seconds(13);
    }
}
