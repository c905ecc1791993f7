use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinicbook_core::models::{
    announcement::{Announcement, NewAnnouncement},
    booking::{Booking, BookingRange, NewBooking, RescheduleOutcome},
    calendar::{BlockedDate, BlockedInterval, DateOverride, NewBlockedInterval, NewDateOverride},
    schedule::{GlobalSettings, OperatingHours, UpsertOperatingHoursRequest, WeekdaySlot},
    window::TimeWindow,
};
use eyre::Result;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::ClinicStore;

#[derive(Debug, Default)]
struct MemoryState {
    operating_hours: BTreeMap<u8, OperatingHours>,
    settings: GlobalSettings,
    weekday_slots: BTreeMap<u8, BTreeSet<TimeWindow>>,
    overrides: Vec<DateOverride>,
    blocked_dates: BTreeMap<NaiveDate, BlockedDate>,
    blocked_intervals: Vec<BlockedInterval>,
    bookings: Vec<Booking>,
    announcements: Vec<Announcement>,
    /// Closing overrides that replaced an `available = true` statement.
    restorable: BTreeSet<Uuid>,
}

impl MemoryState {
    /// A service holds one booking per start time on a date.
    fn slot_taken(&self, date: NaiveDate, time: &TimeWindow, service: &str, except: Option<Uuid>) -> bool {
        self.bookings.iter().any(|b| {
            b.date == date
                && b.time.start_minute() == time.start_minute()
                && b.service == service
                && Some(b.id) != except
        })
    }

    fn is_slot_override(o: &DateOverride, date: NaiveDate, time: TimeWindow, service: &str) -> bool {
        o.date == date && o.time == time && o.service.as_deref() == Some(service)
    }

    fn close_slot(&mut self, date: NaiveDate, time: TimeWindow, service: &str) {
        let mut replaced_available = false;
        let restorable = &mut self.restorable;
        self.overrides.retain(|o| {
            if !Self::is_slot_override(o, date, time, service) {
                return true;
            }
            replaced_available |= o.available || restorable.remove(&o.id);
            false
        });

        let id = Uuid::new_v4();
        if replaced_available {
            self.restorable.insert(id);
        }
        self.overrides.push(DateOverride {
            id,
            date,
            time,
            service: Some(service.to_string()),
            available: false,
        });
    }

    fn reopen_slot(&mut self, date: NaiveDate, time: TimeWindow, service: &str) {
        let mut restore = false;
        let restorable = &mut self.restorable;
        self.overrides.retain(|o| {
            if !(Self::is_slot_override(o, date, time, service) && !o.available) {
                return true;
            }
            restore |= restorable.remove(&o.id);
            false
        });

        if restore {
            self.overrides.push(DateOverride {
                id: Uuid::new_v4(),
                date,
                time,
                service: Some(service.to_string()),
                available: true,
            });
        }
    }
}

/// A [`ClinicStore`] held entirely in memory.
///
/// Every operation takes the state lock for its whole duration, which gives
/// the same all-or-nothing behaviour as the transactions of the Postgres store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn list_operating_hours(&self) -> Result<Vec<OperatingHours>> {
        Ok(self.state.read().await.operating_hours.values().cloned().collect())
    }

    async fn operating_hours_for(&self, weekday: u8) -> Result<Option<OperatingHours>> {
        Ok(self.state.read().await.operating_hours.get(&weekday).cloned())
    }

    async fn upsert_operating_hours(&self, hours: UpsertOperatingHoursRequest) -> Result<OperatingHours> {
        let stored = OperatingHours {
            weekday: hours.weekday,
            is_active: hours.is_active,
            time_intervals: hours.time_intervals,
            updated_at: Some(Utc::now()),
        };
        self.state
            .write()
            .await
            .operating_hours
            .insert(stored.weekday, stored.clone());
        Ok(stored)
    }

    async fn delete_operating_hours(&self, weekday: u8) -> Result<bool> {
        Ok(self.state.write().await.operating_hours.remove(&weekday).is_some())
    }

    async fn global_settings(&self) -> Result<GlobalSettings> {
        Ok(self.state.read().await.settings)
    }

    async fn update_global_settings(&self, settings: GlobalSettings) -> Result<GlobalSettings> {
        self.state.write().await.settings = settings;
        Ok(settings)
    }

    async fn list_weekday_slots(&self, weekday: Option<u8>) -> Result<Vec<WeekdaySlot>> {
        let state = self.state.read().await;
        Ok(state
            .weekday_slots
            .iter()
            .filter(|(day, _)| weekday.is_none_or(|w| w == **day))
            .flat_map(|(day, times)| {
                times.iter().map(move |time| WeekdaySlot {
                    weekday: *day,
                    time: *time,
                })
            })
            .collect())
    }

    async fn replace_weekday_slots(&self, weekday: u8, times: Vec<TimeWindow>) -> Result<Vec<WeekdaySlot>> {
        let times: BTreeSet<TimeWindow> = times.into_iter().collect();
        let slots = times
            .iter()
            .map(|time| WeekdaySlot { weekday, time: *time })
            .collect();
        self.state.write().await.weekday_slots.insert(weekday, times);
        Ok(slots)
    }

    async fn list_date_overrides(&self, date: Option<NaiveDate>) -> Result<Vec<DateOverride>> {
        let state = self.state.read().await;
        let mut overrides: Vec<DateOverride> = state
            .overrides
            .iter()
            .filter(|o| date.is_none_or(|d| d == o.date))
            .cloned()
            .collect();
        overrides.sort_by_key(|o| (o.date, o.time));
        Ok(overrides)
    }

    async fn replace_date_overrides(
        &self,
        date: NaiveDate,
        overrides: Vec<NewDateOverride>,
    ) -> Result<Vec<DateOverride>> {
        let stored: Vec<DateOverride> = overrides
            .into_iter()
            .map(|o| DateOverride {
                id: Uuid::new_v4(),
                date,
                time: o.time,
                service: o.service,
                available: o.available,
            })
            .collect();

        let mut state = self.state.write().await;
        let MemoryState {
            overrides: existing,
            restorable,
            ..
        } = &mut *state;
        existing.retain(|o| {
            if o.date == date {
                restorable.remove(&o.id);
            }
            o.date != date
        });
        existing.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn list_blocked_dates(&self) -> Result<Vec<BlockedDate>> {
        Ok(self.state.read().await.blocked_dates.values().cloned().collect())
    }

    async fn is_date_blocked(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.state.read().await.blocked_dates.contains_key(&date))
    }

    async fn block_date(&self, date: NaiveDate) -> Result<Option<BlockedDate>> {
        let mut state = self.state.write().await;
        if state.blocked_dates.contains_key(&date) {
            return Ok(None);
        }
        let blocked = BlockedDate {
            date,
            created_at: Utc::now(),
        };
        state.blocked_dates.insert(date, blocked.clone());
        Ok(Some(blocked))
    }

    async fn unblock_date(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.state.write().await.blocked_dates.remove(&date).is_some())
    }

    async fn list_blocked_intervals(&self, date: Option<NaiveDate>) -> Result<Vec<BlockedInterval>> {
        let state = self.state.read().await;
        let mut intervals: Vec<BlockedInterval> = state
            .blocked_intervals
            .iter()
            .filter(|i| date.is_none_or(|d| d == i.date))
            .cloned()
            .collect();
        intervals.sort_by_key(|i| (i.date, i.start_time));
        Ok(intervals)
    }

    async fn create_blocked_interval(&self, interval: NewBlockedInterval) -> Result<Option<BlockedInterval>> {
        let mut state = self.state.write().await;
        if state.blocked_intervals.iter().any(|existing| existing.overlaps(&interval)) {
            return Ok(None);
        }

        let created = BlockedInterval {
            id: Uuid::new_v4(),
            date: interval.date,
            start_time: interval.start_time,
            end_time: interval.end_time,
            reason: interval.reason,
            created_at: Utc::now(),
        };
        state.blocked_intervals.push(created.clone());
        Ok(Some(created))
    }

    async fn delete_blocked_interval(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.blocked_intervals.len();
        state.blocked_intervals.retain(|i| i.id != id);
        Ok(state.blocked_intervals.len() != before)
    }

    async fn list_bookings(&self, range: BookingRange) -> Result<Vec<Booking>> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| range.contains(b.date))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.date, b.time, b.created_at));
        Ok(bookings)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        Ok(self.state.read().await.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Option<Booking>> {
        let mut state = self.state.write().await;
        if state.slot_taken(booking.date, &booking.time, &booking.service, None) {
            return Ok(None);
        }

        let created = Booking {
            id: Uuid::new_v4(),
            service: booking.service,
            date: booking.date,
            time: booking.time,
            name: booking.name,
            telephone: booking.telephone,
            email: booking.email,
            created_at: Utc::now(),
        };
        state.close_slot(created.date, created.time, &created.service);
        state.bookings.push(created.clone());
        Ok(Some(created))
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        let mut state = self.state.write().await;
        let Some(position) = state.bookings.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let removed = state.bookings.remove(position);
        state.reopen_slot(removed.date, removed.time, &removed.service);
        Ok(Some(removed))
    }

    async fn reschedule_booking(&self, id: Uuid, date: NaiveDate, time: TimeWindow) -> Result<RescheduleOutcome> {
        let mut state = self.state.write().await;
        let Some(position) = state.bookings.iter().position(|b| b.id == id) else {
            return Ok(RescheduleOutcome::NotFound);
        };
        let current = state.bookings[position].clone();
        if state.slot_taken(date, &time, &current.service, Some(id)) {
            return Ok(RescheduleOutcome::Conflict);
        }

        state.reopen_slot(current.date, current.time, &current.service);
        state.close_slot(date, time, &current.service);

        let moved = Booking { date, time, ..current };
        state.bookings[position] = moved.clone();
        Ok(RescheduleOutcome::Rescheduled(moved))
    }

    async fn active_announcement(&self) -> Result<Option<Announcement>> {
        Ok(self
            .state
            .read()
            .await
            .announcements
            .iter()
            .rev()
            .find(|a| a.active)
            .cloned())
    }

    async fn post_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        let mut state = self.state.write().await;
        for existing in state.announcements.iter_mut() {
            existing.active = false;
        }
        let created = Announcement {
            id: Uuid::new_v4(),
            message: announcement.message,
            kind: announcement.kind,
            active: true,
            created_at: Utc::now(),
        };
        state.announcements.push(created.clone());
        Ok(created)
    }

    async fn deactivate_announcements(&self) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut count = 0;
        for existing in state.announcements.iter_mut().filter(|a| a.active) {
            existing.active = false;
            count += 1;
        }
        Ok(count)
    }
}
