use crate::models::DbBooking;
use chrono::NaiveDate;
use clinicbook_core::models::{
    booking::{BookingRange, NewBooking},
    window::TimeWindow,
};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, service, date, time, name, telephone, email, created_at";

/// Postgres error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

pub async fn list_bookings(pool: &Pool<Postgres>, range: BookingRange) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        ORDER BY date ASC, time ASC, created_at ASC
        "#
    ))
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Any earlier statement about the slot is replaced by a single
/// `available = false` override for the exact (date, time, service). When the
/// replaced statement published the slot, the closing row remembers it so
/// that [`reopen_slot`] can put it back.
async fn close_slot(
    tx: &mut Transaction<'_, Postgres>,
    date: NaiveDate,
    time: &str,
    service: &str,
) -> Result<()> {
    let replaced: Vec<(bool, bool)> = sqlx::query_as(
        r#"
        DELETE FROM date_overrides
        WHERE date = $1 AND time = $2 AND service = $3
        RETURNING available, replaced_available
        "#,
    )
    .bind(date)
    .bind(time)
    .bind(service)
    .fetch_all(&mut **tx)
    .await?;

    let replaced_available = replaced
        .iter()
        .any(|&(available, replaced_available)| available || replaced_available);

    sqlx::query(
        r#"
        INSERT INTO date_overrides (id, date, time, service, available, replaced_available)
        VALUES ($1, $2, $3, $4, FALSE, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(date)
    .bind(time)
    .bind(service)
    .bind(replaced_available)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Removes the closing override and restores the published slot it replaced.
async fn reopen_slot(
    tx: &mut Transaction<'_, Postgres>,
    date: NaiveDate,
    time: &str,
    service: &str,
) -> Result<()> {
    let removed: Vec<(bool,)> = sqlx::query_as(
        r#"
        DELETE FROM date_overrides
        WHERE date = $1 AND time = $2 AND service = $3 AND available = FALSE
        RETURNING replaced_available
        "#,
    )
    .bind(date)
    .bind(time)
    .bind(service)
    .fetch_all(&mut **tx)
    .await?;

    if removed.iter().any(|&(replaced_available,)| replaced_available) {
        sqlx::query(
            r#"
            INSERT INTO date_overrides (id, date, time, service, available)
            VALUES ($1, $2, $3, $4, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(date)
        .bind(time)
        .bind(service)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Stores the booking and closes its slot in one transaction.
///
/// Returns `None` when the service already has a booking starting at the same
/// time on that date; nothing is written in that case.
pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<Option<DbBooking>> {
    let time = booking.time.to_string();
    tracing::debug!(
        "Creating booking: service={}, date={}, time={}",
        booking.service,
        booking.date,
        time
    );

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, service, date, time, name, telephone, email, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        ON CONFLICT (date, service, (split_part(time, '-', 1))) DO NOTHING
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&booking.service)
    .bind(booking.date)
    .bind(&time)
    .bind(&booking.name)
    .bind(&booking.telephone)
    .bind(&booking.email)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(inserted) = inserted else {
        tx.rollback().await?;
        return Ok(None);
    };

    close_slot(&mut tx, booking.date, &time, &booking.service).await?;

    tx.commit().await?;
    Ok(Some(inserted))
}

/// Deletes the booking and removes the override its admission wrote.
pub async fn cancel_booking(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        DELETE FROM bookings
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(booking) = &deleted {
        reopen_slot(&mut tx, booking.date, &booking.time, &booking.service).await?;
    }

    tx.commit().await?;
    Ok(deleted)
}

pub enum RescheduleRow {
    Moved(DbBooking),
    NotFound,
    Conflict,
}

/// Moves a booking to a new date and time, keeping its service. The slot
/// override follows the booking.
pub async fn reschedule_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    date: NaiveDate,
    time: &TimeWindow,
) -> Result<RescheduleRow> {
    let time = time.to_string();
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        tx.rollback().await?;
        return Ok(RescheduleRow::NotFound);
    };

    // The slot index decides exclusivity; a taken target fails the update.
    let moved = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET date = $2, time = $3
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(date)
    .bind(&time)
    .fetch_one(&mut *tx)
    .await;

    let moved = match moved {
        Ok(moved) => moved,
        Err(err) if is_unique_violation(&err) => {
            tx.rollback().await?;
            return Ok(RescheduleRow::Conflict);
        }
        Err(err) => return Err(err.into()),
    };

    reopen_slot(&mut tx, current.date, &current.time, &current.service).await?;
    close_slot(&mut tx, date, &time, &current.service).await?;

    tx.commit().await?;
    Ok(RescheduleRow::Moved(moved))
}
