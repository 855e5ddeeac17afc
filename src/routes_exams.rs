// --------------------------------------------------
// Handles API endpoints related to exam CRUD.
//
// Responsibilities:
// - List a user's exams (by date)
// - Create / read / update exams
// - Delete an exam together with its tasks and subtasks
// --------------------------------------------------

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{Exam, Id};
use crate::repo::{ExamUpdate, NewExam};
use crate::routes_users::UserQuery;
use crate::AppState;

// -----------------------------
// GET /api/exams?user_id=
// -----------------------------
pub async fn list_exams(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<Vec<Exam>>, AppError> {
    let user_id = q.require()?;
    let exams = state
        .store
        .read(|db| {
            db.user(user_id)?;
            Ok(db.exams_for_user(user_id))
        })
        .await?;
    Ok(Json(exams))
}

// -----------------------------
// POST /api/exams
// -----------------------------
pub async fn create_exam(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewExam>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let exam = state.store.write(|db| db.create_exam(input)).await?;
    tracing::info!(user_id = exam.user_id, exam_id = exam.id, "exam created");
    Ok((StatusCode::CREATED, Json(exam)))
}

// -----------------------------
// GET /api/exams/:id
// -----------------------------
pub async fn get_exam(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<Json<Exam>, AppError> {
    let exam = state.store.read(|db| db.exam(id).cloned()).await?;
    Ok(Json(exam))
}

// -----------------------------
// PATCH /api/exams/:id
// -----------------------------
pub async fn update_exam(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<ExamUpdate>,
) -> Result<Json<Exam>, AppError> {
    let exam = state.store.write(|db| db.update_exam(id, input)).await?;
    Ok(Json(exam))
}

// -----------------------------
// DELETE /api/exams/:id
// Cascades to tasks and subtasks
// -----------------------------
pub async fn delete_exam(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<StatusCode, AppError> {
    state.store.write(|db| db.delete_exam(id)).await?;
    tracing::info!(exam_id = id, "exam deleted");
    Ok(StatusCode::NO_CONTENT)
}
