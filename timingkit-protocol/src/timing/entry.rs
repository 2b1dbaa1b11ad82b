use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Timing;

/// Current/next pair rendered by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub current: Timing,
    pub next: Timing,
}

impl TimingEntry {
    pub fn new(current: Timing, next: Timing) -> Self {
        Self { current, next }
    }

    /// The instant this entry becomes relevant.
    pub fn date(&self) -> DateTime<Utc> {
        self.current.instant
    }

    /// Time left until `next`, clamped at zero.
    pub fn remaining(&self, at: DateTime<Utc>) -> Duration {
        let remaining = self.next.instant - at;
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }
}
