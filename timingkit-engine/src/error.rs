use thiserror::Error;

/// Errors raised around timing generation and correction editing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("picker row {index} out of range (0..{len})")]
    PickerIndexOutOfRange { index: usize, len: usize },
    #[error("selection receiver has been dropped")]
    SelectionChannelClosed,
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}
