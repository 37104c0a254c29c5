use std::collections::HashMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::food::dto::MealType;
use crate::meal_plans::dto::{CreateMealPlan, DietType, MealInput, UpdateMealPlan};
use crate::query::DateRange;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub diet_type: Option<DietType>,
    pub target_calories: Option<f64>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fat: Option<f64>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub meal_type: MealType,
    pub name: String,
    pub description: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    #[serde(skip_serializing)]
    pub position: i32,
}

const PLAN_COLUMNS: &str = "id, user_id, date, diet_type, target_calories, target_protein, \
                            target_carbs, target_fat, notes, created_at, updated_at";

const MEAL_COLUMNS: &str =
    "id, meal_plan_id, meal_type, name, description, calories, protein, carbs, fat, position";

async fn insert_meal(
    tx: &mut Transaction<'_, Postgres>,
    plan_id: Uuid,
    position: i32,
    input: &MealInput,
) -> sqlx::Result<Meal> {
    sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals
            (meal_plan_id, meal_type, name, description, calories, protein, carbs, fat, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(plan_id)
    .bind(input.meal_type)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.calories)
    .bind(input.protein)
    .bind(input.carbs)
    .bind(input.fat)
    .bind(position)
    .fetch_one(&mut **tx)
    .await
}

async fn meals_for_plan(db: &PgPool, plan_id: Uuid) -> sqlx::Result<Vec<Meal>> {
    sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE meal_plan_id = $1
        ORDER BY position
        "#
    ))
    .bind(plan_id)
    .fetch_all(db)
    .await
}

/// Creates the plan row and its children as one atomic unit; a failed
/// child insert rolls the plan back.
pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    input: &CreateMealPlan,
) -> sqlx::Result<(MealPlan, Vec<Meal>)> {
    let mut tx = db.begin().await?;

    let plan = sqlx::query_as::<_, MealPlan>(&format!(
        r#"
        INSERT INTO meal_plans
            (user_id, date, diet_type, target_calories, target_protein,
             target_carbs, target_fat, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PLAN_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(input.date)
    .bind(input.diet_type)
    .bind(input.target_calories)
    .bind(input.target_protein)
    .bind(input.target_carbs)
    .bind(input.target_fat)
    .bind(&input.notes)
    .fetch_one(&mut *tx)
    .await?;

    let mut meals = Vec::new();
    if let Some(inputs) = &input.meals {
        for (i, meal) in inputs.iter().enumerate() {
            meals.push(insert_meal(&mut tx, plan.id, i as i32, meal).await?);
        }
    }

    tx.commit().await?;
    Ok((plan, meals))
}

/// The range filter applies to the plan's `date` column.
pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
    diet_type: Option<DietType>,
) -> sqlx::Result<Vec<(MealPlan, Vec<Meal>)>> {
    let plans = sqlx::query_as::<_, MealPlan>(&format!(
        r#"
        SELECT {PLAN_COLUMNS}
        FROM meal_plans
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR date >= $2)
          AND ($3::timestamptz IS NULL OR date <= $3)
          AND ($4::text IS NULL OR diet_type = $4)
        ORDER BY date DESC
        "#
    ))
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(diet_type)
    .fetch_all(db)
    .await?;

    let plan_ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
    let meals = sqlx::query_as::<_, Meal>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
        FROM meals
        WHERE meal_plan_id = ANY($1)
        ORDER BY position
        "#
    ))
    .bind(&plan_ids)
    .fetch_all(db)
    .await?;

    let mut by_plan: HashMap<Uuid, Vec<Meal>> = HashMap::new();
    for meal in meals {
        by_plan.entry(meal.meal_plan_id).or_default().push(meal);
    }

    Ok(plans
        .into_iter()
        .map(|plan| {
            let children = by_plan.remove(&plan.id).unwrap_or_default();
            (plan, children)
        })
        .collect())
}

pub async fn find_by_id(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<(MealPlan, Vec<Meal>)>> {
    let plan = sqlx::query_as::<_, MealPlan>(&format!(
        r#"
        SELECT {PLAN_COLUMNS}
        FROM meal_plans
        WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    let Some(plan) = plan else {
        return Ok(None);
    };
    let meals = meals_for_plan(db, plan.id).await?;
    Ok(Some((plan, meals)))
}

/// Full-replace cascade: when `changes.meals` is supplied, existing
/// children are deleted and the new set inserted in the same
/// transaction as the plan update.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    changes: &UpdateMealPlan,
) -> sqlx::Result<Option<(MealPlan, Vec<Meal>)>> {
    let Some((existing, _)) = find_by_id(db, user_id, id).await? else {
        return Ok(None);
    };

    let mut tx = db.begin().await?;

    let plan = sqlx::query_as::<_, MealPlan>(&format!(
        r#"
        UPDATE meal_plans
        SET date = $2, diet_type = $3, target_calories = $4, target_protein = $5,
            target_carbs = $6, target_fat = $7, notes = $8, updated_at = now()
        WHERE id = $1
        RETURNING {PLAN_COLUMNS}
        "#
    ))
    .bind(existing.id)
    .bind(changes.date.unwrap_or(existing.date))
    .bind(changes.diet_type.or(existing.diet_type))
    .bind(changes.target_calories.or(existing.target_calories))
    .bind(changes.target_protein.or(existing.target_protein))
    .bind(changes.target_carbs.or(existing.target_carbs))
    .bind(changes.target_fat.or(existing.target_fat))
    .bind(changes.notes.as_deref().or(existing.notes.as_deref()))
    .fetch_one(&mut *tx)
    .await?;

    if let Some(inputs) = &changes.meals {
        sqlx::query("DELETE FROM meals WHERE meal_plan_id = $1")
            .bind(plan.id)
            .execute(&mut *tx)
            .await?;
        let mut meals = Vec::new();
        for (i, meal) in inputs.iter().enumerate() {
            meals.push(insert_meal(&mut tx, plan.id, i as i32, meal).await?);
        }
        tx.commit().await?;
        return Ok(Some((plan, meals)));
    }

    tx.commit().await?;
    let meals = meals_for_plan(db, plan.id).await?;
    Ok(Some((plan, meals)))
}

/// Children are removed by the foreign key's ON DELETE CASCADE.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
