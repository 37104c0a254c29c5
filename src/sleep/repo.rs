use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::query::DateRange;
use crate::sleep::dto::{duration_hours, CreateSleepLog, UpdateSleepLog};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SleepLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub sleep_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub sleep_end: OffsetDateTime,
    /// Hours between sleep_start and sleep_end; recomputed whenever
    /// either boundary changes.
    pub duration: f64,
    pub quality: i32,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str =
    "id, user_id, sleep_start, sleep_end, duration, quality, notes, created_at, updated_at";

pub async fn create(db: &PgPool, user_id: Uuid, input: &CreateSleepLog) -> sqlx::Result<SleepLog> {
    sqlx::query_as::<_, SleepLog>(&format!(
        r#"
        INSERT INTO sleep_logs
            (user_id, sleep_start, sleep_end, duration, quality, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(input.sleep_start)
    .bind(input.sleep_end)
    .bind(duration_hours(input.sleep_start, input.sleep_end))
    .bind(input.quality)
    .bind(&input.notes)
    .fetch_one(db)
    .await
}

/// The range filter applies to `sleep_start`, the natural timestamp of
/// a sleep record.
pub async fn list(db: &PgPool, user_id: Uuid, range: DateRange) -> sqlx::Result<Vec<SleepLog>> {
    sqlx::query_as::<_, SleepLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM sleep_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR sleep_start >= $2)
          AND ($3::timestamptz IS NULL OR sleep_start <= $3)
        ORDER BY sleep_start DESC
        "#
    ))
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<SleepLog>> {
    sqlx::query_as::<_, SleepLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM sleep_logs
        WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: &UpdateSleepLog,
) -> sqlx::Result<Option<SleepLog>> {
    let Some(existing) = find_by_id(db, user_id, id).await? else {
        return Ok(None);
    };

    let (sleep_start, sleep_end) = changes.merged_boundaries(&existing);

    let updated = sqlx::query_as::<_, SleepLog>(&format!(
        r#"
        UPDATE sleep_logs
        SET sleep_start = $2, sleep_end = $3, duration = $4, quality = $5,
            notes = $6, updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(existing.id)
    .bind(sleep_start)
    .bind(sleep_end)
    .bind(duration_hours(sleep_start, sleep_end))
    .bind(changes.quality.unwrap_or(existing.quality))
    .bind(changes.notes.as_deref().or(existing.notes.as_deref()))
    .fetch_one(db)
    .await?;

    Ok(Some(updated))
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM sleep_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
