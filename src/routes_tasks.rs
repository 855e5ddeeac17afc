// --------------------------------------------------
// Handles API endpoints related to study tasks and their subtasks.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Move a task to another day, duplicate a task
// - Subtask CRUD under a task, subtask listing per user
// --------------------------------------------------

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::dates;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{Id, StudyTask, SubTask};
use crate::repo::{NewSubTask, NewTask, SubTaskUpdate, TaskUpdate};
use crate::routes_users::UserQuery;
use crate::AppState;

// -----------------------------
// GET /api/tasks?user_id=
// Ordered by date, then order_index
// -----------------------------
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<Vec<StudyTask>>, AppError> {
    let user_id = q.require()?;
    let tasks = state
        .store
        .read(|db| {
            db.user(user_id)?;
            Ok(db.tasks_for_user(user_id))
        })
        .await?;
    Ok(Json(tasks))
}

// -----------------------------
// POST /api/tasks
// -----------------------------
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTask>,
) -> Result<(StatusCode, Json<StudyTask>), AppError> {
    let task = state.store.write(|db| db.create_task(input)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

// -----------------------------
// GET /api/tasks/:id
// -----------------------------
pub async fn get_task(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<Json<StudyTask>, AppError> {
    let task = state.store.read(|db| db.task(id).cloned()).await?;
    Ok(Json(task))
}

// -----------------------------
// PATCH /api/tasks/:id
// -----------------------------
pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<TaskUpdate>,
) -> Result<Json<StudyTask>, AppError> {
    let task = state.store.write(|db| db.update_task(id, input)).await?;
    Ok(Json(task))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes the task and its subtasks
// -----------------------------
pub async fn delete_task(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<StatusCode, AppError> {
    state.store.write(|db| db.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MoveInput {
    pub date: String, // "YYYY-MM-DD"
    pub order_index: Option<i64>,
}

// -----------------------------
// POST /api/tasks/:id/move
// Without order_index the task goes last on the new day
// -----------------------------
pub async fn move_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<MoveInput>,
) -> Result<Json<StudyTask>, AppError> {
    let date = dates::parse_iso("date", &input.date)?;
    let task = state.store.write(|db| db.move_task(id, date, input.order_index)).await?;
    Ok(Json(task))
}

// -----------------------------
// POST /api/tasks/:id/duplicate
// -----------------------------
pub async fn duplicate_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<(StatusCode, Json<StudyTask>), AppError> {
    let copy = state.store.write(|db| db.duplicate_task(id)).await?;
    tracing::info!(task_id = id, copy_id = copy.id, "task duplicated");
    Ok((StatusCode::CREATED, Json(copy)))
}

// -----------------------------
// GET /api/tasks/:id/subtasks
// -----------------------------
pub async fn list_subtasks(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Vec<SubTask>>, AppError> {
    let subs = state
        .store
        .read(|db| {
            db.task(id)?;
            Ok(db.subtasks_for_task(id))
        })
        .await?;
    Ok(Json(subs))
}

// -----------------------------
// POST /api/tasks/:id/subtasks
// -----------------------------
pub async fn create_subtask(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<NewSubTask>,
) -> Result<(StatusCode, Json<SubTask>), AppError> {
    let sub = state.store.write(|db| db.create_subtask(id, input)).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

// -----------------------------
// GET /api/subtasks?user_id=
// Subtasks of every task the user owns
// -----------------------------
pub async fn list_user_subtasks(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<Vec<SubTask>>, AppError> {
    let user_id = q.require()?;
    let subs = state
        .store
        .read(|db| {
            db.user(user_id)?;
            Ok(db.subtasks_for_user(user_id))
        })
        .await?;
    Ok(Json(subs))
}

// -----------------------------
// PATCH /api/subtasks/:id
// -----------------------------
pub async fn update_subtask(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<SubTaskUpdate>,
) -> Result<Json<SubTask>, AppError> {
    let sub = state.store.write(|db| db.update_subtask(id, input)).await?;
    Ok(Json(sub))
}

// -----------------------------
// DELETE /api/subtasks/:id
// -----------------------------
pub async fn delete_subtask(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<StatusCode, AppError> {
    state.store.write(|db| db.delete_subtask(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
