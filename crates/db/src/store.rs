//! The storage seam of the booking service.
//!
//! Handlers only ever talk to a [`ClinicStore`]. [`PgStore`] is the
//! production implementation; [`crate::memory::MemoryStore`] keeps
//! everything in process and backs the tests and the `memory://` mode.

use async_trait::async_trait;
use chrono::NaiveDate;
use clinicbook_core::{
    availability::{DaySnapshot, weekday_index},
    models::{
        announcement::{Announcement, NewAnnouncement},
        booking::{Booking, BookingRange, NewBooking, RescheduleOutcome},
        calendar::{BlockedDate, BlockedInterval, DateOverride, NewBlockedInterval, NewDateOverride},
        schedule::{GlobalSettings, OperatingHours, UpsertOperatingHoursRequest, WeekdaySlot},
        window::TimeWindow,
    },
};
use eyre::Result;
use mockall::automock;
use uuid::Uuid;

use crate::DbPool;
use crate::models::convert_all;
use crate::repositories::{
    announcement as announcement_repo, blocked as blocked_repo, booking as booking_repo,
    date_override as override_repo, schedule as schedule_repo,
};

#[automock]
#[async_trait]
pub trait ClinicStore: Send + Sync {
    async fn list_operating_hours(&self) -> Result<Vec<OperatingHours>>;
    async fn operating_hours_for(&self, weekday: u8) -> Result<Option<OperatingHours>>;
    async fn upsert_operating_hours(&self, hours: UpsertOperatingHoursRequest) -> Result<OperatingHours>;
    async fn delete_operating_hours(&self, weekday: u8) -> Result<bool>;

    async fn global_settings(&self) -> Result<GlobalSettings>;
    async fn update_global_settings(&self, settings: GlobalSettings) -> Result<GlobalSettings>;

    async fn list_weekday_slots(&self, weekday: Option<u8>) -> Result<Vec<WeekdaySlot>>;
    async fn replace_weekday_slots(&self, weekday: u8, times: Vec<TimeWindow>) -> Result<Vec<WeekdaySlot>>;

    async fn list_date_overrides(&self, date: Option<NaiveDate>) -> Result<Vec<DateOverride>>;
    async fn replace_date_overrides(
        &self,
        date: NaiveDate,
        overrides: Vec<NewDateOverride>,
    ) -> Result<Vec<DateOverride>>;

    async fn list_blocked_dates(&self) -> Result<Vec<BlockedDate>>;
    async fn is_date_blocked(&self, date: NaiveDate) -> Result<bool>;
    /// `None` when the date was already blocked.
    async fn block_date(&self, date: NaiveDate) -> Result<Option<BlockedDate>>;
    async fn unblock_date(&self, date: NaiveDate) -> Result<bool>;

    async fn list_blocked_intervals(&self, date: Option<NaiveDate>) -> Result<Vec<BlockedInterval>>;
    /// `None` when the interval overlaps one already stored for the date.
    async fn create_blocked_interval(&self, interval: NewBlockedInterval) -> Result<Option<BlockedInterval>>;
    async fn delete_blocked_interval(&self, id: Uuid) -> Result<bool>;

    /// Bookings within `range`, ordered by date, time and creation.
    async fn list_bookings(&self, range: BookingRange) -> Result<Vec<Booking>>;
    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>>;
    /// Stores the booking and closes its slot atomically. `None` means the
    /// service already holds a booking starting at that time on that date,
    /// and nothing was written.
    async fn create_booking(&self, booking: NewBooking) -> Result<Option<Booking>>;
    /// Removes the booking and re-opens its slot.
    async fn cancel_booking(&self, id: Uuid) -> Result<Option<Booking>>;
    async fn reschedule_booking(&self, id: Uuid, date: NaiveDate, time: TimeWindow) -> Result<RescheduleOutcome>;

    async fn active_announcement(&self) -> Result<Option<Announcement>>;
    async fn post_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn deactivate_announcements(&self) -> Result<u64>;
}

/// Gathers every input of the availability resolver for one date.
pub async fn load_day(store: &dyn ClinicStore, date: NaiveDate, service: Option<String>) -> Result<DaySnapshot> {
    let weekday = weekday_index(date);

    let blocked = store.is_date_blocked(date).await?;
    if blocked {
        return Ok(DaySnapshot {
            date,
            service,
            blocked,
            ..DaySnapshot::default()
        });
    }

    Ok(DaySnapshot {
        date,
        service,
        blocked,
        operating_hours: store.operating_hours_for(weekday).await?,
        settings: store.global_settings().await?,
        weekday_slots: store.list_weekday_slots(Some(weekday)).await?,
        overrides: store.list_date_overrides(Some(date)).await?,
        blocked_intervals: store.list_blocked_intervals(Some(date)).await?,
        bookings: store.list_bookings(BookingRange::day(date)).await?,
    })
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn list_operating_hours(&self) -> Result<Vec<OperatingHours>> {
        convert_all(schedule_repo::list_operating_hours(&self.pool).await?)
    }

    async fn operating_hours_for(&self, weekday: u8) -> Result<Option<OperatingHours>> {
        schedule_repo::get_operating_hours(&self.pool, i16::from(weekday))
            .await?
            .map(OperatingHours::try_from)
            .transpose()
    }

    async fn upsert_operating_hours(&self, hours: UpsertOperatingHoursRequest) -> Result<OperatingHours> {
        let row = schedule_repo::upsert_operating_hours(
            &self.pool,
            i16::from(hours.weekday),
            hours.is_active,
            &hours.time_intervals,
        )
        .await?;
        row.try_into()
    }

    async fn delete_operating_hours(&self, weekday: u8) -> Result<bool> {
        schedule_repo::delete_operating_hours(&self.pool, i16::from(weekday)).await
    }

    async fn global_settings(&self) -> Result<GlobalSettings> {
        match schedule_repo::get_global_settings(&self.pool).await? {
            Some(row) => row.try_into(),
            None => Ok(GlobalSettings::default()),
        }
    }

    async fn update_global_settings(&self, settings: GlobalSettings) -> Result<GlobalSettings> {
        let minutes = i32::try_from(settings.booking_duration_minutes)?;
        schedule_repo::update_global_settings(&self.pool, minutes)
            .await?
            .try_into()
    }

    async fn list_weekday_slots(&self, weekday: Option<u8>) -> Result<Vec<WeekdaySlot>> {
        convert_all(schedule_repo::list_weekday_slots(&self.pool, weekday.map(i16::from)).await?)
    }

    async fn replace_weekday_slots(&self, weekday: u8, times: Vec<TimeWindow>) -> Result<Vec<WeekdaySlot>> {
        convert_all(schedule_repo::replace_weekday_slots(&self.pool, i16::from(weekday), &times).await?)
    }

    async fn list_date_overrides(&self, date: Option<NaiveDate>) -> Result<Vec<DateOverride>> {
        convert_all(override_repo::list_date_overrides(&self.pool, date).await?)
    }

    async fn replace_date_overrides(
        &self,
        date: NaiveDate,
        overrides: Vec<NewDateOverride>,
    ) -> Result<Vec<DateOverride>> {
        convert_all(override_repo::replace_date_overrides(&self.pool, date, &overrides).await?)
    }

    async fn list_blocked_dates(&self) -> Result<Vec<BlockedDate>> {
        let rows = blocked_repo::list_blocked_dates(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn is_date_blocked(&self, date: NaiveDate) -> Result<bool> {
        blocked_repo::is_date_blocked(&self.pool, date).await
    }

    async fn block_date(&self, date: NaiveDate) -> Result<Option<BlockedDate>> {
        Ok(blocked_repo::block_date(&self.pool, date).await?.map(Into::into))
    }

    async fn unblock_date(&self, date: NaiveDate) -> Result<bool> {
        blocked_repo::unblock_date(&self.pool, date).await
    }

    async fn list_blocked_intervals(&self, date: Option<NaiveDate>) -> Result<Vec<BlockedInterval>> {
        let rows = blocked_repo::list_blocked_intervals(&self.pool, date).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_blocked_interval(&self, interval: NewBlockedInterval) -> Result<Option<BlockedInterval>> {
        let row = blocked_repo::create_blocked_interval(&self.pool, &interval).await?;
        Ok(row.map(Into::into))
    }

    async fn delete_blocked_interval(&self, id: Uuid) -> Result<bool> {
        blocked_repo::delete_blocked_interval(&self.pool, id).await
    }

    async fn list_bookings(&self, range: BookingRange) -> Result<Vec<Booking>> {
        convert_all(booking_repo::list_bookings(&self.pool, range).await?)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        booking_repo::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Option<Booking>> {
        booking_repo::create_booking(&self.pool, &booking)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        booking_repo::cancel_booking(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn reschedule_booking(&self, id: Uuid, date: NaiveDate, time: TimeWindow) -> Result<RescheduleOutcome> {
        let outcome = match booking_repo::reschedule_booking(&self.pool, id, date, &time).await? {
            booking_repo::RescheduleRow::Moved(row) => RescheduleOutcome::Rescheduled(row.try_into()?),
            booking_repo::RescheduleRow::NotFound => RescheduleOutcome::NotFound,
            booking_repo::RescheduleRow::Conflict => RescheduleOutcome::Conflict,
        };
        Ok(outcome)
    }

    async fn active_announcement(&self) -> Result<Option<Announcement>> {
        let row = announcement_repo::get_active_announcement(&self.pool).await?;
        Ok(row.map(Into::into))
    }

    async fn post_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        Ok(announcement_repo::post_announcement(&self.pool, &announcement).await?.into())
    }

    async fn deactivate_announcements(&self) -> Result<u64> {
        announcement_repo::deactivate_announcements(&self.pool).await
    }
}
