//! TimingKit engine - day generation, active/upcoming selection, widget
//! timelines and the correction picker.

pub mod calculation;
pub mod error;
pub mod generator;
pub mod picker;
pub mod selector;
pub mod widget;

pub use calculation::{CalculationMethod, FixedSchedule, IntervalSchedule};
pub use error::EngineError;
pub use generator::{from_fn, DailyTimingGenerator, FnSource, TimingSource};
pub use picker::{CorrectionPicker, PickerOption, PickerSelection};
pub use selector::TimingSelector;
pub use widget::{ReloadHandle, ReloadPolicy, TimelineProvider, WidgetTimeline};
