use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::window::{TimeWindow, hhmm, minute_of_day, parse_clock};

/// A per-date statement about one slot that takes precedence over the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: TimeWindow,
    pub service: Option<String>,
    pub available: bool,
}

impl DateOverride {
    /// Overrides without a service speak for every service.
    pub fn applies_to(&self, service: Option<&str>) -> bool {
        match (service, self.service.as_deref()) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(own)) => own.is_empty() || own == wanted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDateOverride {
    pub time: TimeWindow,
    pub service: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateOverrideInput {
    pub time: String,
    pub service: Option<String>,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceDateOverridesRequest {
    pub date: Option<NaiveDate>,
    pub overrides: Option<Vec<DateOverrideInput>>,
}

impl ReplaceDateOverridesRequest {
    pub fn validate(self) -> BookingResult<(NaiveDate, Vec<NewDateOverride>)> {
        let (Some(date), Some(overrides)) = (self.date, self.overrides) else {
            return Err(BookingError::Validation("date and overrides are required".to_string()));
        };

        let overrides = overrides
            .into_iter()
            .map(|input| -> BookingResult<NewDateOverride> {
                Ok(NewDateOverride {
                    time: input.time.parse::<TimeWindow>()?,
                    service: input.service.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
                    available: input.available,
                })
            })
            .collect::<BookingResult<Vec<_>>>()?;

        Ok((date, overrides))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDate {
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDateRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedInterval {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl BlockedInterval {
    pub fn minutes(&self) -> (u32, u32) {
        (minute_of_day(self.start_time), minute_of_day(self.end_time))
    }

    pub fn overlaps(&self, other: &NewBlockedInterval) -> bool {
        self.date == other.date && self.start_time < other.end_time && other.start_time < self.end_time
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockedInterval {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockedIntervalRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

impl CreateBlockedIntervalRequest {
    pub fn validate(self) -> BookingResult<NewBlockedInterval> {
        let (Some(date), Some(start), Some(end)) = (self.date, self.start_time, self.end_time) else {
            return Err(BookingError::Validation(
                "date, startTime, and endTime are required".to_string(),
            ));
        };

        let start_time = parse_clock(&start)?;
        let end_time = parse_clock(&end)?;
        if end_time <= start_time {
            return Err(BookingError::Validation(
                "endTime must be later than startTime".to_string(),
            ));
        }

        Ok(NewBlockedInterval {
            date,
            start_time,
            end_time,
            reason: self.reason.unwrap_or_default().trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub all: bool,
}
