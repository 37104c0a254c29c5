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
    mood::{
        dto::{CreateMoodLog, MoodListQuery, MoodLogEnvelope, MoodLogList, MoodTotals,
              UpdateMoodLog},
        repo,
    },
    query::normalize_range,
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MoodListQuery>,
) -> Result<Json<MoodLogList>, ApiError> {
    let range = normalize_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    let mood_logs = repo::list(&state.db, user_id, range).await?;
    let totals = MoodTotals::from_logs(&mood_logs);
    Ok(Json(MoodLogList { mood_logs, totals }))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateMoodLog>,
) -> Result<(StatusCode, Json<MoodLogEnvelope>), ApiError> {
    payload.validate()?;
    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);
    let mood_log = repo::create(&state.db, user_id, &payload, logged_at).await?;
    info!(user_id = %user_id, mood_log_id = %mood_log.id, "mood log created");
    Ok((
        StatusCode::CREATED,
        Json(MoodLogEnvelope {
            message: Some("Mood log created successfully".to_string()),
            mood_log,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MoodLogEnvelope>, ApiError> {
    let mood_log = repo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mood log not found".to_string()))?;
    Ok(Json(MoodLogEnvelope {
        message: None,
        mood_log,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateMoodLog>,
) -> Result<Json<MoodLogEnvelope>, ApiError> {
    payload.validate()?;
    let mood_log = repo::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mood log not found".to_string()))?;
    info!(user_id = %user_id, mood_log_id = %mood_log.id, "mood log updated");
    Ok(Json(MoodLogEnvelope {
        message: Some("Mood log updated successfully".to_string()),
        mood_log,
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Mood log not found".to_string()));
    }
    info!(user_id = %user_id, mood_log_id = %id, "mood log deleted");
    Ok(Json(json!({ "message": "Mood log deleted successfully" })))
}
