//! Departure times and the time-of-day windows used for schedule lookups.
//!
//! Everything here is wall-clock time without a date. Windows never wrap
//! past midnight.

use chrono::NaiveTime;

use crate::models::types::*;

/// Closed window `[start, end]` over the time of day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Check if a departure falls in the window, both bounds included
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// A window whose start lies after its end matches nothing
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| TransitError::InvalidData(format!("bad time of day {value:?}: {e}")))
}
