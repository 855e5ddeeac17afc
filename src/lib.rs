// Define data modules
pub mod models; // Data structures (User, Exam, StudyTask, templates, Db)
pub mod error; // AppError and its HTTP mapping
pub mod extract; // Request extractors with JSON error bodies
pub mod dates; // Day offsets against an anchor date
pub mod store; // Persistent storage (load/save db.json)
pub mod repo; // Row-level CRUD on the dataset
pub mod templates; // Template build / copy
pub mod logic; // Readiness and progress scoring
pub mod task_catalog; // Built-in study task templates
pub mod suggest; // Task suggestions for an exam
pub mod seed; // Sample schedule for new users
pub mod config;
pub mod logging;

mod routes_users; // HTTP handlers for users
mod routes_exams; // HTTP handlers for exams
mod routes_tasks; // HTTP handlers for tasks & subtasks
mod routes_templates; // HTTP handlers for templates
mod routes_plan; // HTTP handlers for progress, day plan, suggestions, seed

use std::path::Path;
use std::sync::Arc;

// Import axum routing utilities and Router
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}

/// The API under `/api` plus the static UI as fallback.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        // users
        .route("/users", get(routes_users::list_users).post(routes_users::create_user))
        .route("/users/:id", get(routes_users::get_user))
        .route("/users/:id/preferences", patch(routes_users::update_preferences))
        .route("/users/:id/language", patch(routes_users::update_language))
        .route("/users/:id/role", patch(routes_users::update_role))
        // exams
        .route("/exams", get(routes_exams::list_exams).post(routes_exams::create_exam))
        .route(
            "/exams/:id",
            get(routes_exams::get_exam)
                .patch(routes_exams::update_exam)
                .delete(routes_exams::delete_exam),
        )
        .route("/exams/:id/suggestions", get(routes_plan::get_suggestions))
        .route("/exams/:id/suggestions/confirm", post(routes_plan::confirm_suggestions))
        // tasks
        .route("/tasks", get(routes_tasks::list_tasks).post(routes_tasks::create_task))
        .route(
            "/tasks/:id",
            get(routes_tasks::get_task)
                .patch(routes_tasks::update_task)
                .delete(routes_tasks::delete_task),
        )
        .route("/tasks/:id/move", post(routes_tasks::move_task))
        .route("/tasks/:id/duplicate", post(routes_tasks::duplicate_task))
        .route(
            "/tasks/:id/subtasks",
            get(routes_tasks::list_subtasks).post(routes_tasks::create_subtask),
        )
        .route("/subtasks", get(routes_tasks::list_user_subtasks))
        .route(
            "/subtasks/:id",
            patch(routes_tasks::update_subtask).delete(routes_tasks::delete_subtask),
        )
        // templates
        .route(
            "/templates",
            get(routes_templates::list_templates).post(routes_templates::create_template),
        )
        .route("/templates/public", get(routes_templates::list_public_templates))
        .route(
            "/templates/:id",
            get(routes_templates::get_template).delete(routes_templates::delete_template),
        )
        .route("/templates/:id/copy", post(routes_templates::copy_template))
        // plan
        .route("/plan/progress", get(routes_plan::get_progress))
        .route("/plan/day", get(routes_plan::get_day))
        .route("/seed/:user_id", post(routes_plan::seed))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
