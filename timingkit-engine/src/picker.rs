use serde::Serialize;
use timingkit_protocol::prelude::{TimingType, CORRECTION_RANGE};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::error::EngineError;

pub const HEADER_TITLE: &str = "Time Correction";

/// One selectable row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    pub title: String,
    pub minutes: i32,
}

/// Sent to the picker's owner when a row is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickerSelection {
    pub kind: TimingType,
    pub index: usize,
    pub minutes: i32,
}

/// Correction choices for a single timing.
///
/// The picker holds only the sending half of its owner's channel, so the
/// owner is never referenced back.
#[derive(Debug)]
pub struct CorrectionPicker {
    kind: TimingType,
    options: Vec<PickerOption>,
    selected_index: usize,
    selections: UnboundedSender<PickerSelection>,
}

impl CorrectionPicker {
    pub fn new(
        kind: TimingType,
        current: i32,
        selections: UnboundedSender<PickerSelection>,
    ) -> Self {
        let options: Vec<PickerOption> = CORRECTION_RANGE
            .map(|minutes| PickerOption {
                title: option_title(minutes),
                minutes,
            })
            .collect();
        let selected_index = options
            .iter()
            .position(|option| option.minutes == current)
            .unwrap_or(0);

        Self {
            kind,
            options,
            selected_index,
            selections,
        }
    }

    pub fn kind(&self) -> TimingType {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.name()
    }

    pub fn header_title(&self) -> &'static str {
        HEADER_TITLE
    }

    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Row index holding `minutes`, if it is a valid correction.
    pub fn index_of(&self, minutes: i32) -> Option<usize> {
        self.options.iter().position(|option| option.minutes == minutes)
    }

    /// Marks `index` as selected and reports it to the owner.
    pub fn select(&mut self, index: usize) -> Result<PickerSelection, EngineError> {
        let option = self
            .options
            .get(index)
            .ok_or(EngineError::PickerIndexOutOfRange {
                index,
                len: self.options.len(),
            })?;

        let selection = PickerSelection {
            kind: self.kind,
            index,
            minutes: option.minutes,
        };
        self.selections
            .send(selection)
            .map_err(|_| EngineError::SelectionChannelClosed)?;
        self.selected_index = index;
        debug!(kind = %self.kind, minutes = selection.minutes, "correction picked");
        Ok(selection)
    }
}

fn option_title(minutes: i32) -> String {
    if minutes > 0 {
        format!("+{minutes} Minutes")
    } else {
        format!("{minutes} Minutes")
    }
}
