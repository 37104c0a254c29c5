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
    exercise::{
        dto::{
            CreateExercise, ExerciseEnvelope, ExerciseList, ExerciseListQuery, ExerciseTotals,
            UpdateExercise,
        },
        repo,
    },
    extract::AppJson,
    query::normalize_range,
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ExerciseListQuery>,
) -> Result<Json<ExerciseList>, ApiError> {
    let range = normalize_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    let exercises = repo::list(&state.db, user_id, range, q.exercise_type).await?;
    let totals = ExerciseTotals::from_exercises(&exercises);
    Ok(Json(ExerciseList { exercises, totals }))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateExercise>,
) -> Result<(StatusCode, Json<ExerciseEnvelope>), ApiError> {
    payload.validate()?;
    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);
    let exercise = repo::create(&state.db, user_id, &payload, logged_at).await?;
    info!(user_id = %user_id, exercise_id = %exercise.id, "exercise logged");
    Ok((
        StatusCode::CREATED,
        Json(ExerciseEnvelope {
            message: Some("Exercise logged successfully".to_string()),
            exercise,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExerciseEnvelope>, ApiError> {
    let exercise = repo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;
    Ok(Json(ExerciseEnvelope {
        message: None,
        exercise,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateExercise>,
) -> Result<Json<ExerciseEnvelope>, ApiError> {
    payload.validate()?;
    let exercise = repo::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;
    info!(user_id = %user_id, exercise_id = %exercise.id, "exercise updated");
    Ok(Json(ExerciseEnvelope {
        message: Some("Exercise updated successfully".to_string()),
        exercise,
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Exercise not found".to_string()));
    }
    info!(user_id = %user_id, exercise_id = %id, "exercise deleted");
    Ok(Json(json!({ "message": "Exercise deleted successfully" })))
}
