pub mod error;
pub mod timing;

pub use error::ProtocolError;

pub mod prelude {
    pub use crate::error::ProtocolError;
    pub use crate::timing::{
        correction_description, Coordinate, Corrections, DailyTimingSet, Timing, TimingEntry,
        TimingType, CORRECTION_RANGE,
    };
}
