//! Daily trigger time.

use crate::CoreError;
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

/// A single time of day, in host local time, at which the report is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSpec {
    at: NaiveTime,
}

impl ScheduleSpec {
    /// 09:00, the default report time.
    pub const DEFAULT_HOUR: u32 = 9;

    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self {
            at: NaiveTime::from_hms_opt(Self::DEFAULT_HOUR, 0, 0).unwrap_or_default(),
        }
    }
}

impl FromStr for ScheduleSpec {
    type Err = CoreError;

    /// Parse `HH:MM` (or `HH:MM:SS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(Self::new)
            .map_err(|_| CoreError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%H:%M"))
    }
}
