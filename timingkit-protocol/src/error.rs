use thiserror::Error;

use crate::timing::TimingType;

/// Errors raised while building or editing timing values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("correction of {minutes} minutes for {kind} is outside -120..=120")]
    CorrectionOutOfRange { kind: TimingType, minutes: i32 },
    #[error("{found} timing placed in the {expected} slot")]
    MisplacedTiming {
        expected: TimingType,
        found: TimingType,
    },
    #[error("unknown timing name: {0}")]
    UnknownTiming(String),
}
