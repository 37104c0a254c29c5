use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::food::dto::{CreateFoodLog, MealType, UpdateFoodLog};
use crate::query::DateRange;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub meal_type: MealType,
    pub serving_size: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, food_name, calories, protein, carbs, fat, fiber, \
                       meal_type, serving_size, notes, logged_at, created_at, updated_at";

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    input: &CreateFoodLog,
    logged_at: OffsetDateTime,
) -> sqlx::Result<FoodLog> {
    sqlx::query_as::<_, FoodLog>(&format!(
        r#"
        INSERT INTO food_logs
            (user_id, food_name, calories, protein, carbs, fat, fiber,
             meal_type, serving_size, notes, logged_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&input.food_name)
    .bind(input.calories)
    .bind(input.protein)
    .bind(input.carbs)
    .bind(input.fat)
    .bind(input.fiber)
    .bind(input.meal_type)
    .bind(&input.serving_size)
    .bind(&input.notes)
    .bind(logged_at)
    .fetch_one(db)
    .await
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
    meal_type: Option<MealType>,
) -> sqlx::Result<Vec<FoodLog>> {
    sqlx::query_as::<_, FoodLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM food_logs
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR logged_at >= $2)
          AND ($3::timestamptz IS NULL OR logged_at <= $3)
          AND ($4::text IS NULL OR meal_type = $4)
        ORDER BY logged_at DESC
        "#
    ))
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(meal_type)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<FoodLog>> {
    sqlx::query_as::<_, FoodLog>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM food_logs
        WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Merges the supplied fields over the stored record. Returns `None`
/// when the record does not exist for this user.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: &UpdateFoodLog,
) -> sqlx::Result<Option<FoodLog>> {
    let Some(existing) = find_by_id(db, user_id, id).await? else {
        return Ok(None);
    };

    let updated = sqlx::query_as::<_, FoodLog>(&format!(
        r#"
        UPDATE food_logs
        SET food_name = $2, calories = $3, protein = $4, carbs = $5, fat = $6,
            fiber = $7, meal_type = $8, serving_size = $9, notes = $10,
            logged_at = $11, updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(existing.id)
    .bind(changes.food_name.as_deref().unwrap_or(&existing.food_name))
    .bind(changes.calories.unwrap_or(existing.calories))
    .bind(changes.protein.or(existing.protein))
    .bind(changes.carbs.or(existing.carbs))
    .bind(changes.fat.or(existing.fat))
    .bind(changes.fiber.or(existing.fiber))
    .bind(changes.meal_type.unwrap_or(existing.meal_type))
    .bind(changes.serving_size.as_deref().or(existing.serving_size.as_deref()))
    .bind(changes.notes.as_deref().or(existing.notes.as_deref()))
    .bind(changes.logged_at.unwrap_or(existing.logged_at))
    .fetch_one(db)
    .await?;

    Ok(Some(updated))
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM food_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
