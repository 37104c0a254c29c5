use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::AppJson,
    meal_plans::{
        dto::{CreateMealPlan, MealPlanDetails, MealPlanEnvelope, MealPlanList,
              MealPlanListQuery, UpdateMealPlan},
        repo,
    },
    query::normalize_range,
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MealPlanListQuery>,
) -> Result<Json<MealPlanList>, ApiError> {
    let range = normalize_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    let plans = repo::list(&state.db, user_id, range, q.diet_type).await?;
    Ok(Json(MealPlanList {
        meal_plans: plans
            .into_iter()
            .map(|(plan, meals)| MealPlanDetails { plan, meals })
            .collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateMealPlan>,
) -> Result<(StatusCode, Json<MealPlanEnvelope>), ApiError> {
    payload.validate()?;
    let (plan, meals) = repo::create(&state.db, user_id, &payload).await?;
    info!(user_id = %user_id, meal_plan_id = %plan.id, meals = meals.len(), "meal plan created");
    Ok((
        StatusCode::CREATED,
        Json(MealPlanEnvelope {
            message: Some("Meal plan created successfully".to_string()),
            meal_plan: MealPlanDetails { plan, meals },
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealPlanEnvelope>, ApiError> {
    let (plan, meals) = repo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".to_string()))?;
    Ok(Json(MealPlanEnvelope {
        message: None,
        meal_plan: MealPlanDetails { plan, meals },
    }))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateMealPlan>,
) -> Result<Json<MealPlanEnvelope>, ApiError> {
    payload.validate()?;
    let (plan, meals) = repo::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".to_string()))?;
    info!(user_id = %user_id, meal_plan_id = %plan.id, "meal plan updated");
    Ok(Json(MealPlanEnvelope {
        message: Some("Meal plan updated successfully".to_string()),
        meal_plan: MealPlanDetails { plan, meals },
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Meal plan not found".to_string()));
    }
    info!(user_id = %user_id, meal_plan_id = %id, "meal plan deleted");
    Ok(Json(json!({ "message": "Meal plan deleted successfully" })))
}
