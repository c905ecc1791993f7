use crate::models::DbAnnouncement;
use clinicbook_core::models::announcement::NewAnnouncement;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_active_announcement(pool: &Pool<Postgres>) -> Result<Option<DbAnnouncement>> {
    let announcement = sqlx::query_as::<_, DbAnnouncement>(
        r#"
        SELECT id, message, kind, active, created_at
        FROM announcements
        WHERE active = TRUE
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(announcement)
}

/// Deactivates whatever is live and publishes `announcement` in its place.
pub async fn post_announcement(pool: &Pool<Postgres>, announcement: &NewAnnouncement) -> Result<DbAnnouncement> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE announcements
        SET active = FALSE
        WHERE active = TRUE
        "#,
    )
    .execute(&mut *tx)
    .await?;

    let created = sqlx::query_as::<_, DbAnnouncement>(
        r#"
        INSERT INTO announcements (id, message, kind, active, created_at)
        VALUES ($1, $2, $3, TRUE, NOW())
        RETURNING id, message, kind, active, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&announcement.message)
    .bind(announcement.kind.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// Returns how many announcements were switched off.
pub async fn deactivate_announcements(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE announcements
        SET active = FALSE
        WHERE active = TRUE
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
