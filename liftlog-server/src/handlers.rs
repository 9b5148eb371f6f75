use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use liftlog::UserId;
use liftlog::db::models::{ExerciseTemplate, MuscleGroup, NewLoggedExercise, Workout};
use liftlog::service::WorkoutSummary;
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkoutsParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExercisesParams {
    pub muscle_group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutBody {
    pub name: Option<String>,
    pub user_id: Option<String>,
    pub exercises: Option<Vec<NewLoggedExercise>>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceWorkoutBody {
    pub name: Option<String>,
    pub exercises: Option<Vec<NewLoggedExercise>>,
}

#[derive(Debug, Deserialize)]
pub struct SetCompletionBody {
    pub completed: Option<bool>,
}

pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

pub async fn list_workouts(
    State(state): State<AppState>,
    params: Result<Query<ListWorkoutsParams>, QueryRejection>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    let Query(params) = params?;
    let user = UserId::parse(params.user_id.as_deref())?;
    Ok(Json(state.service.list_workouts_for_user(&user).await?))
}

pub async fn create_workout(
    State(state): State<AppState>,
    body: Result<Json<CreateWorkoutBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let Json(body) = body?;
    let user = UserId::parse(body.user_id.as_deref())?;
    let name = body
        .name
        .ok_or_else(|| ApiError::bad_request("name is required"))?;
    let exercises = body
        .exercises
        .ok_or_else(|| ApiError::bad_request("exercises array is required"))?;

    let workout = state
        .service
        .create_workout(&user, &name, &exercises)
        .await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<AppState>,
    Path(workout_id): Path<String>,
) -> Result<Json<Workout>, ApiError> {
    Ok(Json(state.service.get_workout(&workout_id).await?))
}

pub async fn replace_workout(
    State(state): State<AppState>,
    Path(workout_id): Path<String>,
    body: Result<Json<ReplaceWorkoutBody>, JsonRejection>,
) -> Result<Json<Workout>, ApiError> {
    let Json(body) = body?;
    let exercises = body
        .exercises
        .ok_or_else(|| ApiError::bad_request("exercises array is required"))?;

    let workout = state
        .service
        .replace_workout_exercises(&workout_id, body.name.as_deref(), &exercises)
        .await?;
    Ok(Json(workout))
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path(workout_id): Path<String>,
    body: Result<Json<SetCompletionBody>, JsonRejection>,
) -> Result<Json<Workout>, ApiError> {
    let Json(body) = body?;
    let completed = body
        .completed
        .ok_or_else(|| ApiError::bad_request("completed must be a boolean"))?;
    Ok(Json(
        state.service.set_completion(&workout_id, completed).await?,
    ))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(workout_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.service.delete_workout(&workout_id).await?;
    Ok(Json(json!({ "message": "Workout deleted successfully" })))
}

pub async fn workout_summary(
    State(state): State<AppState>,
    Path(workout_id): Path<String>,
) -> Result<Json<WorkoutSummary>, ApiError> {
    Ok(Json(state.service.workout_summary(&workout_id).await?))
}

pub async fn list_exercises(
    State(state): State<AppState>,
    params: Result<Query<ListExercisesParams>, QueryRejection>,
) -> Result<Json<Vec<ExerciseTemplate>>, ApiError> {
    let Query(params) = params?;
    Ok(Json(
        state
            .service
            .list_exercise_templates(params.muscle_group.as_deref())
            .await?,
    ))
}

pub async fn list_muscle_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<MuscleGroup>>, ApiError> {
    Ok(Json(state.service.list_muscle_groups().await?))
}
