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
    query::normalize_range,
    sleep::{
        dto::{CreateSleepLog, SleepListQuery, SleepLogEnvelope, SleepLogList, SleepTotals,
              UpdateSleepLog},
        repo,
    },
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SleepListQuery>,
) -> Result<Json<SleepLogList>, ApiError> {
    let range = normalize_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    let sleep_logs = repo::list(&state.db, user_id, range).await?;
    let totals = SleepTotals::from_logs(&sleep_logs);
    Ok(Json(SleepLogList { sleep_logs, totals }))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateSleepLog>,
) -> Result<(StatusCode, Json<SleepLogEnvelope>), ApiError> {
    payload.validate()?;
    let sleep_log = repo::create(&state.db, user_id, &payload).await?;
    info!(user_id = %user_id, sleep_log_id = %sleep_log.id, "sleep log created");
    Ok((
        StatusCode::CREATED,
        Json(SleepLogEnvelope {
            message: Some("Sleep log created successfully".to_string()),
            sleep_log,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SleepLogEnvelope>, ApiError> {
    let sleep_log = repo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sleep log not found".to_string()))?;
    Ok(Json(SleepLogEnvelope {
        message: None,
        sleep_log,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateSleepLog>,
) -> Result<Json<SleepLogEnvelope>, ApiError> {
    payload.validate()?;
    let sleep_log = repo::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sleep log not found".to_string()))?;
    info!(user_id = %user_id, sleep_log_id = %sleep_log.id, "sleep log updated");
    Ok(Json(SleepLogEnvelope {
        message: Some("Sleep log updated successfully".to_string()),
        sleep_log,
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Sleep log not found".to_string()));
    }
    info!(user_id = %user_id, sleep_log_id = %id, "sleep log deleted");
    Ok(Json(json!({ "message": "Sleep log deleted successfully" })))
}
