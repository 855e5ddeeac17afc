// --------------------------------------------------
// Handles API endpoints for schedule templates.
//
// Responsibilities:
// - List templates visible to a user, list public templates
// - Build a template from a user's exams
// - Read a template with its relative exams and tasks
// - Copy a template onto a new target date
// - Delete (owner only)
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
use crate::models::{Id, ScheduleTemplate};
use crate::routes_users::UserQuery;
use crate::templates::{self, CopyOutcome, TemplateDetail, TemplateRequest};
use crate::AppState;

// -----------------------------
// GET /api/templates?user_id=
// Own templates, then public ones of others
// -----------------------------
pub async fn list_templates(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<Vec<ScheduleTemplate>>, AppError> {
    let user_id = q.require()?;
    let list = state
        .store
        .read(|db| {
            db.user(user_id)?;
            Ok(db.templates_for_user(user_id))
        })
        .await?;
    Ok(Json(list))
}

// -----------------------------
// GET /api/templates/public
// -----------------------------
pub async fn list_public_templates(State(state): State<AppState>) -> Result<Json<Vec<ScheduleTemplate>>, AppError> {
    let list = state.store.read(|db| Ok(db.public_templates())).await?;
    Ok(Json(list))
}

// -----------------------------
// POST /api/templates
// -----------------------------
pub async fn create_template(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TemplateRequest>,
) -> Result<(StatusCode, Json<ScheduleTemplate>), AppError> {
    let template = state.store.write(|db| templates::build_template(db, req)).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

// -----------------------------
// GET /api/templates/:id?user_id=
// -----------------------------
pub async fn get_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<TemplateDetail>, AppError> {
    let viewer = q.require()?;
    let detail = state.store.read(|db| templates::template_detail(db, id, viewer)).await?;
    Ok(Json(detail))
}

// -----------------------------
// DELETE /api/templates/:id?user_id=
// Only the owner may delete
// -----------------------------
pub async fn delete_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<StatusCode, AppError> {
    let caller = q.require()?;
    state.store.write(|db| db.delete_template(id, caller)).await?;
    tracing::info!(template_id = id, user_id = caller, "template deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CopyInput {
    pub user_id: Id,
    pub target_date: String, // "YYYY-MM-DD", becomes the last exam day
}

// -----------------------------
// POST /api/templates/:id/copy
// -----------------------------
pub async fn copy_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<CopyInput>,
) -> Result<(StatusCode, Json<CopyOutcome>), AppError> {
    let target = dates::parse_iso("target_date", &input.target_date)?;
    let outcome = state
        .store
        .write(|db| templates::copy_template(db, id, input.user_id, target))
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
