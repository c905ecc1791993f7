use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinicbook_core::models::{
    announcement::{Announcement, AnnouncementKind},
    booking::Booking,
    calendar::{BlockedDate, BlockedInterval, DateOverride},
    schedule::{GlobalSettings, OpeningInterval, OperatingHours, WeekdaySlot},
    window::TimeWindow,
};
use eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbOperatingHours {
    pub weekday: i16,
    pub is_active: bool,
    pub time_intervals: Json<Vec<OpeningInterval>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGlobalSettings {
    pub booking_duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWeekdaySlot {
    pub weekday: i16,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDateOverride {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub service: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBlockedDate {
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBlockedInterval {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub service: String,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub telephone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAnnouncement {
    pub id: Uuid,
    pub message: String,
    pub kind: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn weekday(raw: i16) -> Result<u8> {
    u8::try_from(raw)
        .ok()
        .filter(|w| *w <= 6)
        .ok_or_else(|| eyre!("stored weekday {} is out of range", raw))
}

impl TryFrom<DbOperatingHours> for OperatingHours {
    type Error = eyre::Report;

    fn try_from(row: DbOperatingHours) -> Result<Self> {
        Ok(OperatingHours {
            weekday: weekday(row.weekday)?,
            is_active: row.is_active,
            time_intervals: row.time_intervals.0,
            updated_at: Some(row.updated_at),
        })
    }
}

impl TryFrom<DbGlobalSettings> for GlobalSettings {
    type Error = eyre::Report;

    fn try_from(row: DbGlobalSettings) -> Result<Self> {
        Ok(GlobalSettings {
            booking_duration_minutes: u32::try_from(row.booking_duration_minutes)
                .wrap_err("stored booking duration is negative")?,
        })
    }
}

impl TryFrom<DbWeekdaySlot> for WeekdaySlot {
    type Error = eyre::Report;

    fn try_from(row: DbWeekdaySlot) -> Result<Self> {
        Ok(WeekdaySlot {
            weekday: weekday(row.weekday)?,
            time: row.time.parse::<TimeWindow>().wrap_err("stored weekday slot has an invalid time")?,
        })
    }
}

impl TryFrom<DbDateOverride> for DateOverride {
    type Error = eyre::Report;

    fn try_from(row: DbDateOverride) -> Result<Self> {
        Ok(DateOverride {
            id: row.id,
            date: row.date,
            time: row.time.parse::<TimeWindow>().wrap_err("stored date override has an invalid time")?,
            service: row.service,
            available: row.available,
        })
    }
}

impl From<DbBlockedDate> for BlockedDate {
    fn from(row: DbBlockedDate) -> Self {
        BlockedDate {
            date: row.date,
            created_at: row.created_at,
        }
    }
}

impl From<DbBlockedInterval> for BlockedInterval {
    fn from(row: DbBlockedInterval) -> Self {
        BlockedInterval {
            id: row.id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        Ok(Booking {
            id: row.id,
            service: row.service,
            date: row.date,
            time: row.time.parse::<TimeWindow>().wrap_err("stored booking has an invalid time")?,
            name: row.name,
            telephone: row.telephone,
            email: row.email,
            created_at: row.created_at,
        })
    }
}

impl From<DbAnnouncement> for Announcement {
    fn from(row: DbAnnouncement) -> Self {
        Announcement {
            id: row.id,
            message: row.message,
            kind: AnnouncementKind::from_stored(&row.kind),
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Converts a batch of rows, failing on the first row that does not decode.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
