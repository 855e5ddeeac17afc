// --------------------------------------------------
// Handles API endpoints for progress, the daily plan and suggestions.
//
// Responsibilities:
// - Readiness overview per user
// - Time accounting for one day
// - Task suggestions for an exam, and confirming them
// - Sample data for a new user
// --------------------------------------------------

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::logic::{self, DaySummary, Overview};
use crate::models::{Id, StudyTask};
use crate::routes_users::UserQuery;
use crate::seed::{self, SeedOutcome};
use crate::suggest::{self, SuggestedTask, SuggestionDraft};
use crate::AppState;

// Calendar day on the server clock
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn date_or_today(field: &'static str, value: Option<&str>) -> Result<NaiveDate, AppError> {
    value.map_or_else(|| Ok(today()), |v| dates::parse_iso(field, v))
}

// -----------------------------
// GET /api/plan/progress?user_id=
// -----------------------------
pub async fn get_progress(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<UserQuery>,
) -> Result<Json<Overview>, AppError> {
    let user_id = q.require()?;
    let overview = state.store.read(|db| logic::overview_for_user(db, user_id)).await?;
    Ok(Json(overview))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub user_id: Option<Id>,
    pub date: Option<String>, // "YYYY-MM-DD", defaults to today
}

// -----------------------------
// GET /api/plan/day?user_id=&date=
// -----------------------------
pub async fn get_day(State(state): State<AppState>, ApiQuery(q): ApiQuery<DayQuery>) -> Result<Json<DaySummary>, AppError> {
    let user_id = q.user_id.ok_or_else(|| AppError::validation("user_id", "is required"))?;
    let date = date_or_today("date", q.date.as_deref())?;
    let summary = state
        .store
        .read(|db| logic::day_summary_for_user(db, user_id, date))
        .await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub today: Option<String>,
}

// -----------------------------
// GET /api/exams/:id/suggestions?today=
// Empty when the exam is today or already past
// -----------------------------
pub async fn get_suggestions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiQuery(q): ApiQuery<SuggestionQuery>,
) -> Result<Json<Vec<SuggestedTask>>, AppError> {
    let today = date_or_today("today", q.today.as_deref())?;
    let list = state.store.read(|db| suggest::suggest_for_exam(db, id, today)).await?;
    Ok(Json(list))
}

#[derive(Debug, Deserialize)]
pub struct CustomEntry {
    pub title: String,
    pub date: String, // "YYYY-MM-DD"
}

#[derive(Debug, Deserialize)]
pub struct ConfirmInput {
    #[serde(default)]
    pub suggestions: Vec<SuggestedTask>,
    #[serde(default)]
    pub custom: Vec<CustomEntry>,
}

// -----------------------------
// POST /api/exams/:id/suggestions/confirm
// Stores the selected entries as tasks
// -----------------------------
pub async fn confirm_suggestions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(input): ApiJson<ConfirmInput>,
) -> Result<(StatusCode, Json<Vec<StudyTask>>), AppError> {
    let mut draft = SuggestionDraft::new(input.suggestions);
    for entry in input.custom {
        let date = dates::parse_iso("date", &entry.date)?;
        draft.add_custom(entry.title, date)?;
    }
    let tasks = state
        .store
        .write(|db| suggest::confirm_suggestions(db, id, draft))
        .await?;
    Ok((StatusCode::CREATED, Json(tasks)))
}

// -----------------------------
// POST /api/seed/:user_id
// No-op when the user already has exams
// -----------------------------
pub async fn seed(State(state): State<AppState>, ApiPath(user_id): ApiPath<Id>) -> Result<Json<SeedOutcome>, AppError> {
    let today = today();
    let outcome = state.store.write(|db| seed::seed_user(db, user_id, today)).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::NewUser;
    use crate::store::Store;

    async fn state_with_user() -> (tempfile::TempDir, AppState, Id) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Store::open(dir.path().join("db.json")).unwrap());
        let user = state
            .store
            .write(|db| {
                db.create_user(NewUser {
                    name: "Ada".into(),
                    role: None,
                    language: None,
                    default_subtask_duration: None,
                })
            })
            .await
            .unwrap();
        (dir, state, user.id)
    }

    #[tokio::test]
    async fn missing_user_id_is_a_validation_error() {
        let (_dir, state, _) = state_with_user().await;
        let err = get_progress(State(state), ApiQuery(UserQuery { user_id: None }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "user_id", .. }));
    }

    #[tokio::test]
    async fn seed_is_once_and_day_needs_a_valid_date() {
        let (_dir, state, user_id) = state_with_user().await;

        let Json(first) = seed(State(state.clone()), ApiPath(user_id)).await.unwrap();
        assert!(first.created);
        let Json(again) = seed(State(state.clone()), ApiPath(user_id)).await.unwrap();
        assert!(!again.created);

        let err = get_day(
            State(state.clone()),
            ApiQuery(DayQuery {
                user_id: Some(user_id),
                date: Some("not-a-date".into()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "date", .. }));

        // seeded study days start 3 days after today
        let Json(day) = get_day(
            State(state),
            ApiQuery(DayQuery {
                user_id: Some(user_id),
                date: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(day.tasks, 0);
    }

    #[tokio::test]
    async fn unknown_exam_suggestions_are_not_found() {
        let (_dir, state, _) = state_with_user().await;
        let err = get_suggestions(State(state), ApiPath(99), ApiQuery(SuggestionQuery { today: None }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("exam")));
    }
}
