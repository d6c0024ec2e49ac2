//! Task CRUD handlers. Every route is scoped to the authenticated caller.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tasklist_core::{Task, TaskInput, TaskQuery};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list(&user.user_id, &query).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<TaskInput>,
) -> Result<Response, ApiError> {
    let task = state.tasks.create(input, &user.user_id).await?;
    let location = format!("/api/tasks/{}", task.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(task)).into_response())
}

pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get(id, &user.user_id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.update(id, input, &user.user_id).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(id, &user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
