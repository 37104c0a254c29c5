use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::mood::dto::{CreateMoodLog, UpdateMoodLog};
use crate::query::DateRange;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: i32,
    pub energy: Option<i32>,
    pub stress: Option<i32>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str =
    "id, user_id, mood, energy, stress, notes, logged_at, created_at, updated_at";

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    input: &CreateMoodLog,
    logged_at: OffsetDateTime,
) -> sqlx::Result<MoodLog> {
    sqlx::query_as::<_, MoodLog>(&format!(
        r#"
        INSERT INTO mood_logs (user_id, mood, energy, stress, notes, logged_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(input.mood)
    .bind(input.energy)
    .bind(input.stress)
    .bind(&input.notes)
    .bind(logged_at)
    .fetch_one(db)
    .await
}

pub async fn list(db: &PgPool, user_id: Uuid, range: DateRange) -> sqlx::Result<Vec<MoodLog>> {
    sqlx::query_as::<_, MoodLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM mood_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR logged_at >= $2)
          AND ($3::timestamptz IS NULL OR logged_at <= $3)
        ORDER BY logged_at DESC
        "#
    ))
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<MoodLog>> {
    sqlx::query_as::<_, MoodLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM mood_logs
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
    changes: &UpdateMoodLog,
) -> sqlx::Result<Option<MoodLog>> {
    let Some(existing) = find_by_id(db, user_id, id).await? else {
        return Ok(None);
    };

    let updated = sqlx::query_as::<_, MoodLog>(&format!(
        r#"
        UPDATE mood_logs
        SET mood = $2, energy = $3, stress = $4, notes = $5, logged_at = $6,
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(existing.id)
    .bind(changes.mood.unwrap_or(existing.mood))
    .bind(changes.energy.or(existing.energy))
    .bind(changes.stress.or(existing.stress))
    .bind(changes.notes.as_deref().or(existing.notes.as_deref()))
    .bind(changes.logged_at.unwrap_or(existing.logged_at))
    .fetch_one(db)
    .await?;

    Ok(Some(updated))
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM mood_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
