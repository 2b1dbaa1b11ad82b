use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// The five daily timings, declared in the order they occur within a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimingType {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl TimingType {
    /// Every category in day order.
    pub const ALL: [TimingType; 5] = [
        TimingType::Fajr,
        TimingType::Dhuhr,
        TimingType::Asr,
        TimingType::Maghrib,
        TimingType::Isha,
    ];

    /// Position of the category within a day, `0..=4`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TimingType::Fajr => "Fajr",
            TimingType::Dhuhr => "Dhuhr",
            TimingType::Asr => "Asr",
            TimingType::Maghrib => "Maghrib",
            TimingType::Isha => "Isha",
        }
    }

    /// Key used for this category in persisted correction tables.
    pub fn key(self) -> &'static str {
        match self {
            TimingType::Fajr => "fajr",
            TimingType::Dhuhr => "dhuhr",
            TimingType::Asr => "asr",
            TimingType::Maghrib => "maghrib",
            TimingType::Isha => "isha",
        }
    }
}

impl fmt::Display for TimingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimingType {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ProtocolError::UnknownTiming(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("fajr", TimingType::Fajr)]
    #[test_case("Dhuhr", TimingType::Dhuhr)]
    #[test_case(" ASR ", TimingType::Asr)]
    #[test_case("maghrib", TimingType::Maghrib)]
    #[test_case("Isha", TimingType::Isha)]
    fn parses_case_insensitive_names(raw: &str, expected: TimingType) {
        assert_eq!(raw.parse::<TimingType>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "sunrise".parse::<TimingType>(),
            Err(ProtocolError::UnknownTiming("sunrise".into()))
        );
    }

    #[test]
    fn order_follows_the_day() {
        assert!(TimingType::ALL.windows(2).all(|pair| pair[0] < pair[1]));
        for (position, kind) in TimingType::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }
}
