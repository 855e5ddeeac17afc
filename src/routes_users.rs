// --------------------------------------------------
// Handles API endpoints for users and their preferences.
//
// Responsibilities:
// - List / create / read users
// - Update default subtask duration, language, role
// - `?user_id=` query shared by the other route modules
// --------------------------------------------------

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::{Id, User};
use crate::repo::NewUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<Id>,
}

impl UserQuery {
    pub fn require(&self) -> Result<Id, AppError> {
        self.user_id.ok_or_else(|| AppError::validation("user_id", "is required"))
    }
}

// -----------------------------
// GET /api/users
// All users sorted by name
// -----------------------------
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.read(|db| Ok(db.users_by_name())).await?;
    Ok(Json(users))
}

// -----------------------------
// POST /api/users
// -----------------------------
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<Json<User>, AppError> {
    let user = state.store.write(|db| db.create_user(input)).await?;
    tracing::info!(user_id = user.id, "user created");
    Ok(Json(user))
}

// -----------------------------
// GET /api/users/:id
// -----------------------------
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<Id>) -> Result<Json<User>, AppError> {
    let user = state.store.read(|db| db.user(id).cloned()).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct PreferencesInput {
    pub default_subtask_duration: i64,
}

// -----------------------------
// PATCH /api/users/:id/preferences
// -----------------------------
pub async fn update_preferences(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<PreferencesInput>,
) -> Result<Json<User>, AppError> {
    let user = state
        .store
        .write(|db| db.update_user_preference(id, input.default_subtask_duration))
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct LanguageInput {
    pub language: String,
}

// -----------------------------
// PATCH /api/users/:id/language
// -----------------------------
pub async fn update_language(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<LanguageInput>,
) -> Result<Json<User>, AppError> {
    let user = state.store.write(|db| db.update_user_language(id, &input.language)).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct RoleInput {
    pub role: String,
}

// -----------------------------
// PATCH /api/users/:id/role
// Marks the role as confirmed
// -----------------------------
pub async fn update_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<RoleInput>,
) -> Result<Json<User>, AppError> {
    let user = state.store.write(|db| db.update_user_role(id, &input.role)).await?;
    Ok(Json(user))
}
