use crate::models::DbDateOverride;
use chrono::NaiveDate;
use clinicbook_core::models::calendar::NewDateOverride;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_date_overrides(pool: &Pool<Postgres>, date: Option<NaiveDate>) -> Result<Vec<DbDateOverride>> {
    let overrides = sqlx::query_as::<_, DbDateOverride>(
        r#"
        SELECT id, date, time, service, available
        FROM date_overrides
        WHERE $1::DATE IS NULL OR date = $1
        ORDER BY date ASC, time ASC
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(overrides)
}

/// Replaces every override of `date` with `overrides`, atomically.
pub async fn replace_date_overrides(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    overrides: &[NewDateOverride],
) -> Result<Vec<DbDateOverride>> {
    tracing::debug!("Replacing date overrides: date={}, count={}", date, overrides.len());

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM date_overrides
        WHERE date = $1
        "#,
    )
    .bind(date)
    .execute(&mut *tx)
    .await?;

    let mut stored = Vec::with_capacity(overrides.len());
    for o in overrides {
        let row = sqlx::query_as::<_, DbDateOverride>(
            r#"
            INSERT INTO date_overrides (id, date, time, service, available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, date, time, service, available
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(date)
        .bind(o.time.to_string())
        .bind(o.service.as_deref())
        .bind(o.available)
        .fetch_one(&mut *tx)
        .await?;
        stored.push(row);
    }

    tx.commit().await?;
    Ok(stored)
}
