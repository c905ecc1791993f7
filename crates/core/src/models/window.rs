use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::errors::BookingError;

/// Minutes in one clinic day; window arithmetic never wraps past midnight.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowParseError {
    #[error("time must be written as HH:MM or HH:MM-HH:MM, got '{0}'")]
    Format(String),

    #[error("window '{0}' ends before it starts")]
    Inverted(String),
}

impl From<WindowParseError> for BookingError {
    fn from(err: WindowParseError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

/// A span of the clinic day, written `HH:MM-HH:MM`.
///
/// Legacy weekday templates and older bookings may carry only a start time
/// (`HH:MM`). Such a window has no recorded end and borrows the booking
/// duration wherever a span is needed, see [`TimeWindow::end_minute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeWindow {
    start: NaiveTime,
    end: Option<NaiveTime>,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, WindowParseError> {
        if end <= start {
            return Err(WindowParseError::Inverted(format!(
                "{}-{}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    pub fn starting_at(start: NaiveTime) -> Self {
        Self { start, end: None }
    }

    /// Builds a window from minute offsets, `None` when either bound is not a clock time.
    pub fn from_minutes(start: u32, end: u32) -> Option<Self> {
        let start = clock_from_minutes(start)?;
        let end = clock_from_minutes(end)?;
        Self::new(start, end).ok()
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.end
    }

    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start)
    }

    /// End of the window in minutes; open-ended windows last `fallback_minutes`.
    pub fn end_minute(&self, fallback_minutes: u32) -> u32 {
        match self.end {
            Some(end) => minute_of_day(end),
            None => self.start_minute() + fallback_minutes,
        }
    }

    /// Strict overlap with `[start, end)`; touching boundaries do not overlap.
    pub fn overlaps(&self, start: u32, end: u32, fallback_minutes: u32) -> bool {
        self.start_minute() < end && self.end_minute(fallback_minutes) > start
    }

    /// Whether `minute` falls inside `[start, end)` of this window.
    pub fn contains_minute(&self, minute: u32, fallback_minutes: u32) -> bool {
        self.start_minute() <= minute && minute < self.end_minute(fallback_minutes)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start.format("%H:%M"))?;
        if let Some(end) = self.end {
            write!(f, "-{}", end.format("%H:%M"))?;
        }
        Ok(())
    }
}

impl FromStr for TimeWindow {
    type Err = WindowParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let mut parts = trimmed.splitn(2, '-');
        let start = parts
            .next()
            .and_then(|s| parse_clock(s).ok())
            .ok_or_else(|| WindowParseError::Format(raw.to_string()))?;

        match parts.next() {
            None => Ok(Self::starting_at(start)),
            Some(end) => {
                let end = parse_clock(end).map_err(|_| WindowParseError::Format(raw.to_string()))?;
                Self::new(start, end).map_err(|_| WindowParseError::Inverted(raw.to_string()))
            }
        }
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = WindowParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.to_string()
    }
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn clock_from_minutes(minutes: u32) -> Option<NaiveTime> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Parses `HH:MM`, also accepting a trailing `:SS`.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, WindowParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| WindowParseError::Format(raw.to_string()))
}

/// Serde adapter writing a [`NaiveTime`] as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}
