use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::exercise::dto::{CreateExercise, ExerciseType, Intensity, UpdateExercise};
use crate::query::DateRange;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub duration: i32,
    pub calories: Option<f64>,
    pub distance: Option<f64>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, exercise_name, exercise_type, duration, calories, \
                       distance, intensity, notes, logged_at, created_at, updated_at";

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    input: &CreateExercise,
    logged_at: OffsetDateTime,
) -> sqlx::Result<Exercise> {
    sqlx::query_as::<_, Exercise>(&format!(
        r#"
        INSERT INTO exercises
            (user_id, exercise_name, exercise_type, duration, calories,
             distance, intensity, notes, logged_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&input.exercise_name)
    .bind(input.exercise_type)
    .bind(input.duration)
    .bind(input.calories)
    .bind(input.distance)
    .bind(input.intensity)
    .bind(&input.notes)
    .bind(logged_at)
    .fetch_one(db)
    .await
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
    exercise_type: Option<ExerciseType>,
) -> sqlx::Result<Vec<Exercise>> {
    sqlx::query_as::<_, Exercise>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM exercises
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR logged_at >= $2)
          AND ($3::timestamptz IS NULL OR logged_at <= $3)
          AND ($4::text IS NULL OR exercise_type = $4)
        ORDER BY logged_at DESC
        "#
    ))
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(exercise_type)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<Exercise>> {
    sqlx::query_as::<_, Exercise>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM exercises
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
    changes: &UpdateExercise,
) -> sqlx::Result<Option<Exercise>> {
    let Some(existing) = find_by_id(db, user_id, id).await? else {
        return Ok(None);
    };

    let updated = sqlx::query_as::<_, Exercise>(&format!(
        r#"
        UPDATE exercises
        SET exercise_name = $2, exercise_type = $3, duration = $4, calories = $5,
            distance = $6, intensity = $7, notes = $8, logged_at = $9,
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(existing.id)
    .bind(
        changes
            .exercise_name
            .as_deref()
            .unwrap_or(&existing.exercise_name),
    )
    .bind(changes.exercise_type.unwrap_or(existing.exercise_type))
    .bind(changes.duration.unwrap_or(existing.duration))
    .bind(changes.calories.or(existing.calories))
    .bind(changes.distance.or(existing.distance))
    .bind(changes.intensity.or(existing.intensity))
    .bind(changes.notes.as_deref().or(existing.notes.as_deref()))
    .bind(changes.logged_at.unwrap_or(existing.logged_at))
    .fetch_one(db)
    .await?;

    Ok(Some(updated))
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
