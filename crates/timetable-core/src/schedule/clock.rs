//! Minute-precision wall-clock time of day.
//!
//! Internally a time is an integer count of minutes since midnight. The
//! `"HH:MM"` string is only used at the edges: serde, CLI arguments and
//! display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: Self = Self(0);

    /// Build from raw minutes. Returns `None` for values outside one day.
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Advance by `minutes`, wrapping past midnight.
    pub fn wrapping_add(self, minutes: u16) -> Self {
        let sum = (u32::from(self.0) + u32::from(minutes)) % u32::from(MINUTES_PER_DAY);
        Self(sum as u16)
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinuteOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let (hh, mm) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if hh.is_empty() || hh.len() > 2 || mm.len() != 2 || !digits(hh) || !digits(mm) {
            return Err(invalid());
        }
        let hour: u16 = hh.parse().map_err(|_| invalid())?;
        let minute: u16 = mm.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_hours() {
        assert_eq!("09:30".parse::<MinuteOfDay>().unwrap().minutes(), 570);
        assert_eq!("9:30".parse::<MinuteOfDay>().unwrap().minutes(), 570);
        assert_eq!("00:00".parse::<MinuteOfDay>().unwrap(), MinuteOfDay::MIDNIGHT);
        assert_eq!("23:59".parse::<MinuteOfDay>().unwrap().minutes(), 1439);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        for bad in ["24:00", "12:60", "12", "ab:cd", "12:5", "", "-1:00", "123:00", "+9:30", "9:+5"] {
            assert!(bad.parse::<MinuteOfDay>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(MinuteOfDay::from_hm(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn wrapping_add_rolls_over_midnight() {
        let late = MinuteOfDay::from_hm(23, 59).unwrap();
        assert_eq!(late.wrapping_add(1), MinuteOfDay::MIDNIGHT);
        assert_eq!(late.wrapping_add(2).to_string(), "00:01");
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let t = MinuteOfDay::from_hm(14, 0).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"14:00\"");
        let back: MinuteOfDay = serde_json::from_str("\"14:00\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<MinuteOfDay>("\"25:00\"").is_err());
    }
}
