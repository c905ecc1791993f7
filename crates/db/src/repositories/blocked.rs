use crate::models::{DbBlockedDate, DbBlockedInterval};
use chrono::NaiveDate;
use clinicbook_core::models::calendar::NewBlockedInterval;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Whole-day blocks

pub async fn list_blocked_dates(pool: &Pool<Postgres>) -> Result<Vec<DbBlockedDate>> {
    let dates = sqlx::query_as::<_, DbBlockedDate>(
        r#"
        SELECT date, created_at
        FROM blocked_dates
        ORDER BY date ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(dates)
}

pub async fn is_date_blocked(pool: &Pool<Postgres>, date: NaiveDate) -> Result<bool> {
    let row: Option<(NaiveDate,)> = sqlx::query_as(
        r#"
        SELECT date
        FROM blocked_dates
        WHERE date = $1
        "#,
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Returns `None` when the date is already blocked.
pub async fn block_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<Option<DbBlockedDate>> {
    let blocked = sqlx::query_as::<_, DbBlockedDate>(
        r#"
        INSERT INTO blocked_dates (date, created_at)
        VALUES ($1, NOW())
        ON CONFLICT (date) DO NOTHING
        RETURNING date, created_at
        "#,
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(blocked)
}

pub async fn unblock_date(pool: &Pool<Postgres>, date: NaiveDate) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM blocked_dates
        WHERE date = $1
        "#,
    )
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Partial-day blocks

pub async fn list_blocked_intervals(
    pool: &Pool<Postgres>,
    date: Option<NaiveDate>,
) -> Result<Vec<DbBlockedInterval>> {
    let intervals = sqlx::query_as::<_, DbBlockedInterval>(
        r#"
        SELECT id, date, start_time, end_time, reason, created_at
        FROM blocked_intervals
        WHERE $1::DATE IS NULL OR date = $1
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(intervals)
}

/// Returns `None` when the new interval overlaps an existing one of the same date.
pub async fn create_blocked_interval(
    pool: &Pool<Postgres>,
    interval: &NewBlockedInterval,
) -> Result<Option<DbBlockedInterval>> {
    tracing::debug!(
        "Creating blocked interval: date={}, start={}, end={}",
        interval.date,
        interval.start_time,
        interval.end_time
    );

    let mut tx = pool.begin().await?;

    // Serializes concurrent creations so the overlap check below holds.
    sqlx::query("LOCK TABLE blocked_intervals IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let overlapping: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM blocked_intervals
        WHERE date = $1 AND start_time < $3 AND end_time > $2
        LIMIT 1
        "#,
    )
    .bind(interval.date)
    .bind(interval.start_time)
    .bind(interval.end_time)
    .fetch_optional(&mut *tx)
    .await?;

    if overlapping.is_some() {
        tx.rollback().await?;
        return Ok(None);
    }

    let created = sqlx::query_as::<_, DbBlockedInterval>(
        r#"
        INSERT INTO blocked_intervals (id, date, start_time, end_time, reason, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING id, date, start_time, end_time, reason, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(interval.date)
    .bind(interval.start_time)
    .bind(interval.end_time)
    .bind(&interval.reason)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(created))
}

pub async fn delete_blocked_interval(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM blocked_intervals
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
