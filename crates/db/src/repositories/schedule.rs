use crate::models::{DbGlobalSettings, DbOperatingHours, DbWeekdaySlot};
use clinicbook_core::models::{schedule::OpeningInterval, window::TimeWindow};
use eyre::Result;
use sqlx::{Pool, Postgres, types::Json};

// Operating hours

pub async fn list_operating_hours(pool: &Pool<Postgres>) -> Result<Vec<DbOperatingHours>> {
    let hours = sqlx::query_as::<_, DbOperatingHours>(
        r#"
        SELECT weekday, is_active, time_intervals, updated_at
        FROM operating_hours
        ORDER BY weekday ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(hours)
}

pub async fn get_operating_hours(pool: &Pool<Postgres>, weekday: i16) -> Result<Option<DbOperatingHours>> {
    let hours = sqlx::query_as::<_, DbOperatingHours>(
        r#"
        SELECT weekday, is_active, time_intervals, updated_at
        FROM operating_hours
        WHERE weekday = $1
        "#,
    )
    .bind(weekday)
    .fetch_optional(pool)
    .await?;

    Ok(hours)
}

pub async fn upsert_operating_hours(
    pool: &Pool<Postgres>,
    weekday: i16,
    is_active: bool,
    intervals: &[OpeningInterval],
) -> Result<DbOperatingHours> {
    tracing::debug!(
        "Upserting operating hours: weekday={}, is_active={}, intervals={}",
        weekday,
        is_active,
        intervals.len()
    );

    let hours = sqlx::query_as::<_, DbOperatingHours>(
        r#"
        INSERT INTO operating_hours (weekday, is_active, time_intervals, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        ON CONFLICT (weekday)
        DO UPDATE SET is_active = $2, time_intervals = $3, updated_at = NOW()
        RETURNING weekday, is_active, time_intervals, updated_at
        "#,
    )
    .bind(weekday)
    .bind(is_active)
    .bind(Json(intervals))
    .fetch_one(pool)
    .await?;

    Ok(hours)
}

pub async fn delete_operating_hours(pool: &Pool<Postgres>, weekday: i16) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM operating_hours
        WHERE weekday = $1
        "#,
    )
    .bind(weekday)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Global settings

pub async fn get_global_settings(pool: &Pool<Postgres>) -> Result<Option<DbGlobalSettings>> {
    let settings = sqlx::query_as::<_, DbGlobalSettings>(
        r#"
        SELECT booking_duration_minutes
        FROM global_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

pub async fn update_global_settings(
    pool: &Pool<Postgres>,
    booking_duration_minutes: i32,
) -> Result<DbGlobalSettings> {
    let settings = sqlx::query_as::<_, DbGlobalSettings>(
        r#"
        INSERT INTO global_settings (id, booking_duration_minutes, created_at, updated_at)
        VALUES (1, $1, NOW(), NOW())
        ON CONFLICT (id)
        DO UPDATE SET booking_duration_minutes = $1, updated_at = NOW()
        RETURNING booking_duration_minutes
        "#,
    )
    .bind(booking_duration_minutes)
    .fetch_one(pool)
    .await?;

    Ok(settings)
}

// Legacy weekday slots

pub async fn list_weekday_slots(pool: &Pool<Postgres>, weekday: Option<i16>) -> Result<Vec<DbWeekdaySlot>> {
    let slots = sqlx::query_as::<_, DbWeekdaySlot>(
        r#"
        SELECT weekday, time
        FROM weekday_slots
        WHERE $1::SMALLINT IS NULL OR weekday = $1
        ORDER BY weekday ASC, time ASC
        "#,
    )
    .bind(weekday)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Replaces the whole slot list of one weekday.
pub async fn replace_weekday_slots(
    pool: &Pool<Postgres>,
    weekday: i16,
    times: &[TimeWindow],
) -> Result<Vec<DbWeekdaySlot>> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM weekday_slots
        WHERE weekday = $1
        "#,
    )
    .bind(weekday)
    .execute(&mut *tx)
    .await?;

    let mut slots = Vec::with_capacity(times.len());
    for time in times {
        let slot = sqlx::query_as::<_, DbWeekdaySlot>(
            r#"
            INSERT INTO weekday_slots (weekday, time)
            VALUES ($1, $2)
            ON CONFLICT (weekday, time) DO UPDATE SET time = EXCLUDED.time
            RETURNING weekday, time
            "#,
        )
        .bind(weekday)
        .bind(time.to_string())
        .fetch_one(&mut *tx)
        .await?;
        slots.push(slot);
    }

    tx.commit().await?;
    Ok(slots)
}
