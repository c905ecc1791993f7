use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};
use crate::models::window::{TimeWindow, hhmm, minute_of_day};

/// Booking duration used when no settings row has been written yet.
pub const DEFAULT_BOOKING_DURATION_MINUTES: u32 = 60;

/// Weekdays are numbered from Sunday = 0 to Saturday = 6.
pub fn validate_weekday(weekday: u8) -> BookingResult<u8> {
    if weekday > 6 {
        return Err(BookingError::Validation(format!(
            "weekday must be between 0 (Sunday) and 6 (Saturday), got {}",
            weekday
        )));
    }
    Ok(weekday)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningInterval {
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
}

impl OpeningInterval {
    pub fn minutes(&self) -> (u32, u32) {
        (minute_of_day(self.open_time), minute_of_day(self.close_time))
    }

    /// Cuts the interval into back-to-back windows of `duration` minutes.
    ///
    /// A trailing remainder shorter than `duration` is dropped, so an interval
    /// of length D always yields `floor(D / duration)` windows.
    pub fn windows(&self, duration: u32) -> Vec<TimeWindow> {
        if duration == 0 {
            return Vec::new();
        }
        let (open, close) = self.minutes();
        let mut windows = Vec::new();
        let mut cursor = open;
        while cursor + duration <= close {
            if let Some(window) = TimeWindow::from_minutes(cursor, cursor + duration) {
                windows.push(window);
            }
            cursor += duration;
        }
        windows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub weekday: u8,
    pub is_active: bool,
    #[serde(default)]
    pub time_intervals: Vec<OpeningInterval>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OperatingHours {
    pub fn is_open(&self) -> bool {
        self.is_active && !self.time_intervals.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOperatingHoursRequest {
    pub weekday: u8,
    pub is_active: bool,
    #[serde(default)]
    pub time_intervals: Vec<OpeningInterval>,
}

impl UpsertOperatingHoursRequest {
    /// Checks the weekday, that every interval opens before it closes, and
    /// that the intervals of the day are pairwise disjoint.
    pub fn validate(self) -> BookingResult<Self> {
        validate_weekday(self.weekday)?;

        for interval in &self.time_intervals {
            if interval.open_time >= interval.close_time {
                return Err(BookingError::Validation(format!(
                    "interval {}-{} must open before it closes",
                    interval.open_time.format("%H:%M"),
                    interval.close_time.format("%H:%M")
                )));
            }
        }

        let mut sorted: Vec<(u32, u32)> = self.time_intervals.iter().map(|i| i.minutes()).collect();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[1].0 < pair[0].1) {
            return Err(BookingError::Validation(
                "operating intervals of one weekday must not overlap".to_string(),
            ));
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub booking_duration_minutes: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            booking_duration_minutes: DEFAULT_BOOKING_DURATION_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGlobalSettingsRequest {
    pub booking_duration_minutes: u32,
}

impl UpdateGlobalSettingsRequest {
    pub fn validate(self) -> BookingResult<GlobalSettings> {
        if self.booking_duration_minutes == 0 || self.booking_duration_minutes > 24 * 60 {
            return Err(BookingError::Validation(
                "bookingDurationMinutes must be between 1 and 1440".to_string(),
            ));
        }
        Ok(GlobalSettings {
            booking_duration_minutes: self.booking_duration_minutes,
        })
    }
}

/// One entry of the legacy per-weekday slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySlot {
    pub weekday: u8,
    pub time: TimeWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdaySlotInput {
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceWeekdaySlotsRequest {
    pub weekday: u8,
    #[serde(default)]
    pub slots: Vec<WeekdaySlotInput>,
}

impl ReplaceWeekdaySlotsRequest {
    pub fn validate(self) -> BookingResult<(u8, Vec<TimeWindow>)> {
        let weekday = validate_weekday(self.weekday)?;
        let mut times = self
            .slots
            .iter()
            .map(|slot| slot.time.parse::<TimeWindow>().map_err(BookingError::from))
            .collect::<BookingResult<Vec<_>>>()?;
        times.sort();
        times.dedup();
        Ok((weekday, times))
    }
}
