use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::AppJson,
    food::{
        dto::{CreateFoodLog, FoodListQuery, FoodLogEnvelope, FoodLogList, FoodTotals, UpdateFoodLog},
        repo,
    },
    query::normalize_range,
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<FoodListQuery>,
) -> Result<Json<FoodLogList>, ApiError> {
    let range = normalize_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    let food_logs = repo::list(&state.db, user_id, range, q.meal_type).await?;
    let totals = FoodTotals::from_logs(&food_logs);
    Ok(Json(FoodLogList {
        count: food_logs.len(),
        totals,
        food_logs,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateFoodLog>,
) -> Result<(StatusCode, Json<FoodLogEnvelope>), ApiError> {
    payload.validate()?;
    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);
    let food_log = repo::create(&state.db, user_id, &payload, logged_at).await?;
    info!(user_id = %user_id, food_log_id = %food_log.id, "food log created");
    Ok((
        StatusCode::CREATED,
        Json(FoodLogEnvelope {
            message: Some("Food log created successfully".to_string()),
            food_log,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodLogEnvelope>, ApiError> {
    let food_log = repo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food log not found".to_string()))?;
    Ok(Json(FoodLogEnvelope {
        message: None,
        food_log,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateFoodLog>,
) -> Result<Json<FoodLogEnvelope>, ApiError> {
    payload.validate()?;
    let food_log = repo::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food log not found".to_string()))?;
    info!(user_id = %user_id, food_log_id = %food_log.id, "food log updated");
    Ok(Json(FoodLogEnvelope {
        message: Some("Food log updated successfully".to_string()),
        food_log,
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Food log not found".to_string()));
    }
    info!(user_id = %user_id, food_log_id = %id, "food log deleted");
    Ok(Json(json!({ "message": "Food log deleted successfully" })))
}
