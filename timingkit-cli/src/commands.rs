use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use timingkit_core::config::CoreConfig;
use timingkit_core::errors::TimingKitError;
use timingkit_core::preferences::Preferences;
use timingkit_engine::{
    CalculationMethod, CorrectionPicker, DailyTimingGenerator, EngineError, FixedSchedule,
    IntervalSchedule, ReloadHandle, TimelineProvider, TimingSelector, TimingSource,
};
use timingkit_protocol::prelude::{Coordinate, TimingType};
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;

use crate::output;
use crate::MethodArg;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TimingKitError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Validation(String),
}

type Generator = DailyTimingGenerator<Box<dyn CalculationMethod>>;

/// Everything one invocation needs: the preferences and the timing pipeline
/// built from them.
pub struct Session {
    preferences: Preferences,
    provider: TimelineProvider<Generator>,
    applied_generation: u64,
    offset: FixedOffset,
    method: MethodArg,
    coordinate: Coordinate,
    reference: DateTime<Utc>,
}

impl Session {
    /// `reference` is the instant the command is about; interval schedules
    /// are anchored on it.
    pub fn open(
        config: &CoreConfig,
        method: MethodArg,
        reference: DateTime<Utc>,
    ) -> Result<Self, CliError> {
        let preferences = Preferences::load(&config.preferences_path)?;
        let offset = config
            .utc_offset()
            .unwrap_or_else(|| Local::now().offset().fix());
        Ok(Self::with_preferences(
            preferences,
            offset,
            method,
            config.coordinate,
            reference,
        ))
    }

    pub fn with_preferences(
        mut preferences: Preferences,
        offset: FixedOffset,
        method: MethodArg,
        coordinate: Coordinate,
        reference: DateTime<Utc>,
    ) -> Self {
        let provider = build_provider(&preferences, offset, method, coordinate, reference);

        let reload = provider.reload_handle();
        preferences.on_change(move |event| {
            debug!(change = ?event.change, "preferences changed");
            reload.reload_all();
        });

        Self {
            preferences,
            applied_generation: provider.generation(),
            provider,
            offset,
            method,
            coordinate,
            reference,
        }
    }

    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.provider.selector().date_of(at)
    }

    fn selector(&self) -> &TimingSelector<Generator> {
        self.provider.selector()
    }

    /// Rebuilds the pipeline if timelines were invalidated since it was built.
    fn refresh(&mut self) {
        let generation = self.provider.generation();
        if generation == self.applied_generation {
            return;
        }
        let reload: ReloadHandle = self.provider.reload_handle();
        self.provider = build_provider(
            &self.preferences,
            self.offset,
            self.method,
            self.coordinate,
            self.reference,
        )
        .with_reload_handle(reload);
        self.applied_generation = generation;
    }

    pub fn today(&self, date: NaiveDate, json: bool) -> Result<(), CliError> {
        let day = self.selector().source().daily_timings(date);
        let view = output::DayView::new(&day, self.preferences.corrections(), self.offset);
        output::print_day(&view, json)
    }

    pub fn now(&self, at: DateTime<Utc>, json: bool) -> Result<(), CliError> {
        let entry = self.provider.snapshot(at);
        let view = output::EntryView::new(&entry, at, self.offset);
        output::print_now(&view, json)
    }

    pub fn timeline(&self, at: DateTime<Utc>, count: usize, json: bool) -> Result<(), CliError> {
        let timeline = self.provider.timeline_with_count(at, count);
        output::print_timeline(&timeline, self.offset, json)
    }

    pub fn list_corrections(&self, json: bool) -> Result<(), CliError> {
        output::print_corrections(self.preferences.corrections(), json)
    }

    /// Applies a correction by choosing the matching row of the picker.
    pub fn set_correction(&mut self, kind: TimingType, minutes: i32, json: bool) -> Result<(), CliError> {
        let (selections, mut received) = unbounded_channel();
        let mut picker = CorrectionPicker::new(kind, self.preferences.correction(kind), selections);
        let index = picker.index_of(minutes).ok_or_else(|| {
            CliError::Validation(format!(
                "{minutes} is not a selectable correction for {kind} (use -120..=120)"
            ))
        })?;
        picker.select(index)?;
        drop(picker);

        while let Ok(selection) = received.try_recv() {
            self.preferences
                .set_correction(selection.kind, selection.minutes)?;
        }
        self.refresh();
        output::print_corrections(self.preferences.corrections(), json)
    }

    pub fn reset_corrections(&mut self, json: bool) -> Result<(), CliError> {
        self.preferences.reset()?;
        self.refresh();
        output::print_corrections(self.preferences.corrections(), json)
    }

    pub fn correction_options(&self, kind: TimingType, json: bool) -> Result<(), CliError> {
        let (selections, _received) = unbounded_channel();
        let picker = CorrectionPicker::new(kind, self.preferences.correction(kind), selections);
        output::print_picker(&picker, json)
    }
}

fn build_provider(
    preferences: &Preferences,
    offset: FixedOffset,
    method: MethodArg,
    coordinate: Coordinate,
    reference: DateTime<Utc>,
) -> TimelineProvider<Generator> {
    let method: Box<dyn CalculationMethod> = match method {
        MethodArg::Fixed => Box::new(FixedSchedule::default()),
        MethodArg::Interval => {
            Box::new(IntervalSchedule::with_anchor(interval_anchor(reference, offset)))
        }
    };
    let generator = DailyTimingGenerator::new(method, offset)
        .with_corrections(preferences.corrections())
        .with_coordinate(coordinate);
    TimelineProvider::new(TimingSelector::new(generator, offset))
}

/// Wall-clock minute of `reference` in `offset`.
fn interval_anchor(reference: DateTime<Utc>, offset: FixedOffset) -> NaiveTime {
    let time = reference.with_timezone(&offset).time();
    time.with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or(time)
}
