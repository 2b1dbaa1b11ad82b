mod corrections;
mod day;
mod entry;
mod kind;

pub use corrections::{correction_description, Corrections, CORRECTION_RANGE};
pub use day::{Coordinate, DailyTimingSet, Timing};
pub use entry::TimingEntry;
pub use kind::TimingType;
