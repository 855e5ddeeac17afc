// Study task suggestions for a freshly created exam.
//
// The generator spreads the category's task templates over the days left
// before the exam. Suggestions are handed to the caller as a draft that can
// be edited before `confirm_suggestions` turns the selected ones into tasks.

use std::iter::{Enumerate, Take};
use std::slice;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Db, Difficulty, Id, Language, StudyTask};
use crate::repo::{require_minutes, require_text};
use crate::task_catalog::{self, Phase, TaskTemplate};

pub const CUSTOM_DURATION_MIN: i64 = 45;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestedTask {
    pub title: String,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub selected: bool,
    pub phase: Phase,
}

fn difficulty_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 0.7,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.3,
    }
}

// How many templates to use, never fewer than two.
fn task_count(days_until_exam: i64, template_count: usize, difficulty: Difficulty) -> usize {
    let by_days = (days_until_exam as f64 * 0.8).floor() as i64;
    let by_difficulty = (template_count as f64 * difficulty_multiplier(difficulty)).ceil() as i64;
    by_days.min(by_difficulty).max(2) as usize
}

/// Days after `today` for the template at `index` in its category list.
/// Always within `[0, days_until_exam - 1]`; `days_until_exam` must be positive.
pub fn day_offset(phase: Phase, index: usize, days_until_exam: i64) -> i64 {
    let d = days_until_exam as f64;
    let i = index as f64;
    let raw = match phase {
        Phase::Foundation => (d * (0.1 + i * 0.15)).floor() as i64,
        Phase::Practice => (d * (0.4 + (i - 2.0) * 0.15)).floor() as i64,
        Phase::Review => ((d * (0.8 + (i - 4.0) * 0.1)).floor() as i64).max(1),
    };
    raw.clamp(0, days_until_exam - 1)
}

/// Lazy, single-pass sequence of suggestions in template order.
pub struct Suggestions {
    templates: Take<Enumerate<slice::Iter<'static, TaskTemplate>>>,
    today: NaiveDate,
    days_until_exam: i64,
    language: Language,
}

impl Iterator for Suggestions {
    type Item = SuggestedTask;

    fn next(&mut self) -> Option<SuggestedTask> {
        let (index, template) = self.templates.next()?;
        let offset = day_offset(template.phase, index, self.days_until_exam);
        // offset < days_until_exam, and the exam date itself is representable
        let date = self.today.checked_add_days(Days::new(offset as u64))?;
        Some(SuggestedTask {
            title: task_catalog::task_title(template.key, self.language).to_string(),
            date,
            duration_minutes: template.duration_minutes,
            selected: true,
            phase: template.phase,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.templates.size_hint()
    }
}

pub fn generate(
    subject: &str,
    exam_date: NaiveDate,
    difficulty: Difficulty,
    today: NaiveDate,
    language: Language,
) -> Suggestions {
    let templates = task_catalog::templates_for(task_catalog::category_for(subject));
    let days_until_exam = exam_date.signed_duration_since(today).num_days();
    let count = if days_until_exam <= 0 {
        0
    } else {
        task_count(days_until_exam, templates.len(), difficulty)
    };
    Suggestions {
        templates: templates.iter().enumerate().take(count),
        today,
        days_until_exam,
        language,
    }
}

/// Collected suggestions, ascending by date.
pub fn suggest_tasks(
    subject: &str,
    exam_date: NaiveDate,
    difficulty: Difficulty,
    today: NaiveDate,
    language: Language,
) -> Vec<SuggestedTask> {
    let mut out: Vec<SuggestedTask> = generate(subject, exam_date, difficulty, today, language).collect();
    out.sort_by_key(|s| s.date);
    out
}

// Suggestions for a stored exam, titled in the owner's language.
pub fn suggest_for_exam(db: &Db, exam_id: Id, today: NaiveDate) -> Result<Vec<SuggestedTask>, AppError> {
    let exam = db.exam(exam_id)?;
    let language = db.user(exam.user_id)?.language;
    Ok(suggest_tasks(&exam.subject, exam.date, exam.difficulty, today, language))
}

// -----------------------------
// editable draft
// -----------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionDraft {
    entries: Vec<SuggestedTask>,
}

impl SuggestionDraft {
    pub fn new(entries: impl IntoIterator<Item = SuggestedTask>) -> Self {
        let mut entries: Vec<SuggestedTask> = entries.into_iter().collect();
        entries.sort_by_key(|s| s.date);
        SuggestionDraft { entries }
    }

    pub fn entries(&self) -> &[SuggestedTask] {
        &self.entries
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut SuggestedTask, AppError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or_else(|| AppError::validation("index", format!("{index} is out of range (draft has {len} entries)")))
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, AppError> {
        let entry = self.entry_mut(index)?;
        entry.selected = !entry.selected;
        Ok(entry.selected)
    }

    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> Result<(), AppError> {
        let title = title.into();
        require_text("title", &title)?;
        self.entry_mut(index)?.title = title;
        Ok(())
    }

    // Editing a date does not reorder; ordering is settled on confirm.
    pub fn set_date(&mut self, index: usize, date: NaiveDate) -> Result<(), AppError> {
        self.entry_mut(index)?.date = date;
        Ok(())
    }

    pub fn set_duration(&mut self, index: usize, minutes: i64) -> Result<(), AppError> {
        require_minutes("duration_minutes", minutes)?;
        self.entry_mut(index)?.duration_minutes = minutes;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<SuggestedTask, AppError> {
        self.entry_mut(index)?;
        Ok(self.entries.remove(index))
    }

    /// Appends a user-written entry, selected, then re-sorts by date.
    pub fn add_custom(&mut self, title: impl Into<String>, date: NaiveDate) -> Result<(), AppError> {
        let title = title.into();
        require_text("title", &title)?;
        self.entries.push(SuggestedTask {
            title,
            date,
            duration_minutes: CUSTOM_DURATION_MIN,
            selected: true,
            phase: Phase::Practice,
        });
        self.entries.sort_by_key(|s| s.date);
        Ok(())
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|s| s.selected).count()
    }

    pub fn total_minutes(&self) -> i64 {
        self.entries
            .iter()
            .filter(|s| s.selected)
            .fold(0i64, |acc, s| acc.saturating_add(s.duration_minutes))
    }

    // Selected entries, stably sorted by date.
    fn into_selected(self) -> Vec<SuggestedTask> {
        let mut picked: Vec<SuggestedTask> = self.entries.into_iter().filter(|s| s.selected).collect();
        picked.sort_by_key(|s| s.date);
        picked
    }
}

/// Persists the selected draft entries as tasks of the exam, numbered
/// 0.. in date order.
pub fn confirm_suggestions(db: &mut Db, exam_id: Id, draft: SuggestionDraft) -> Result<Vec<StudyTask>, AppError> {
    let exam = db.exam(exam_id)?.clone();
    let picked = draft.into_selected();
    for s in &picked {
        require_text("title", &s.title)?;
        require_minutes("duration_minutes", s.duration_minutes)?;
    }

    let created: Vec<StudyTask> = picked
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            db.insert_task(StudyTask {
                id: 0,
                user_id: exam.user_id,
                exam_id: exam.id,
                title: s.title,
                date: s.date,
                completed: false,
                duration_minutes: s.duration_minutes,
                order_index: i as i64,
            })
        })
        .collect();

    tracing::info!(exam_id, tasks = created.len(), "suggestions confirmed");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{NewExam, NewUser};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn nothing_when_exam_is_today_or_past() {
        let today = d(2026, 3, 10);
        assert!(suggest_tasks("math", today, Difficulty::Hard, today, Language::En).is_empty());
        assert!(suggest_tasks("math", d(2026, 3, 1), Difficulty::Hard, today, Language::En).is_empty());
    }

    #[test]
    fn language_medium_ten_days() {
        let today = d(2026, 3, 1);
        let out = suggest_tasks("dutch", d(2026, 3, 11), Difficulty::Medium, today, Language::En);
        let offsets: Vec<i64> = out.iter().map(|s| (s.date - today).num_days()).collect();
        assert_eq!(offsets, vec![1, 2, 4, 5, 8, 9]);
        assert_eq!(out[0].title, "Read chapter");
        assert_eq!(out[5].title, "Practice test");
        assert!(out.iter().all(|s| s.selected));
    }

    #[test]
    fn one_day_left_still_gives_two_tasks_today() {
        let today = d(2026, 3, 1);
        let out = suggest_tasks("history", d(2026, 3, 2), Difficulty::Easy, today, Language::Nl);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.date == today));
        assert_eq!(out[0].title, "Hoofdstuk doorlezen");
    }

    #[rstest]
    #[case("latin", Difficulty::Easy, 20, 5)]
    #[case("math", Difficulty::Hard, 30, 6)]
    #[case("art", Difficulty::Hard, 30, 4)]
    #[case("pe", Difficulty::Medium, 3, 2)]
    #[case("biology", Difficulty::Medium, 5, 4)]
    fn count_follows_days_and_difficulty(
        #[case] subject: &str,
        #[case] difficulty: Difficulty,
        #[case] days: u64,
        #[case] expected: usize,
    ) {
        let today = d(2026, 1, 1);
        let exam = today.checked_add_days(Days::new(days)).unwrap();
        assert_eq!(generate(subject, exam, difficulty, today, Language::En).count(), expected);
    }

    #[test]
    fn offsets_stay_before_exam_and_output_is_sorted() {
        let today = d(2026, 1, 1);
        for subject in ["french", "physics", "geography", "music", "ict"] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                for days in 1..=60u64 {
                    let exam = today.checked_add_days(Days::new(days)).unwrap();
                    let out = suggest_tasks(subject, exam, difficulty, today, Language::Fr);
                    assert!(out.len() >= 2);
                    assert!(out.windows(2).all(|w| w[0].date <= w[1].date));
                    for s in &out {
                        assert!(s.date >= today && s.date < exam, "{subject} {days}: {}", s.date);
                    }
                }
            }
        }
    }

    #[test]
    fn generator_is_single_pass() {
        let today = d(2026, 1, 1);
        let mut it = generate("math", d(2026, 1, 31), Difficulty::Medium, today, Language::En);
        let first: Vec<_> = it.by_ref().collect();
        assert_eq!(first.len(), 6);
        assert!(it.next().is_none());
    }

    #[test]
    fn draft_editing() {
        let today = d(2026, 1, 1);
        let mut draft = SuggestionDraft::new(suggest_tasks("math", d(2026, 1, 11), Difficulty::Medium, today, Language::En));
        assert_eq!(draft.selected_count(), 6);
        assert_eq!(draft.total_minutes(), 45 + 30 + 60 + 45 + 30 + 45);

        assert!(!draft.toggle(0).unwrap());
        draft.set_duration(1, 90).unwrap();
        draft.set_title(1, "Formulas sheet").unwrap();
        draft.remove(5).unwrap();
        draft.add_custom("Ask teacher", today).unwrap();

        assert_eq!(draft.entries()[0].title, "Ask teacher");
        assert_eq!(draft.selected_count(), 5);
        assert!(draft.toggle(42).is_err());
        assert!(draft.set_title(0, "  ").is_err());
        assert!(draft.set_duration(0, 0).is_err());
    }

    #[test]
    fn confirm_keeps_selected_in_date_order() {
        let mut db = Db::default();
        let user = db
            .create_user(NewUser {
                name: "Ada".into(),
                role: None,
                language: Some("en".into()),
                default_subtask_duration: None,
            })
            .unwrap();
        let exam = db
            .create_exam(NewExam {
                user_id: user.id,
                subject: "math".into(),
                title: "Algebra".into(),
                date: "2026-01-11".into(),
                difficulty: "medium".into(),
                description: None,
                understanding: 0,
                results: 0,
            })
            .unwrap();

        let today = d(2026, 1, 1);
        let mut draft = SuggestionDraft::new(suggest_for_exam(&db, exam.id, today).unwrap());
        draft.toggle(1).unwrap();
        draft.set_date(0, d(2026, 1, 9)).unwrap();

        let tasks = confirm_suggestions(&mut db, exam.id, draft).unwrap();
        assert_eq!(tasks.len(), 5);
        assert!(tasks.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(tasks.iter().map(|t| t.order_index).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(tasks.iter().all(|t| t.exam_id == exam.id && !t.completed));
        assert_eq!(db.tasks_for_exam(exam.id).len(), 5);
    }

    #[test]
    fn oversized_client_durations_saturate_and_are_refused_on_confirm() {
        let today = d(2026, 1, 1);
        let entry = |title: &str| SuggestedTask {
            title: title.to_string(),
            date: today,
            duration_minutes: i64::MAX,
            selected: true,
            phase: Phase::Practice,
        };
        let draft = SuggestionDraft::new([entry("a"), entry("b")]);
        assert_eq!(draft.total_minutes(), i64::MAX);

        let mut db = Db::default();
        let user = db
            .create_user(NewUser {
                name: "Ada".into(),
                role: None,
                language: None,
                default_subtask_duration: None,
            })
            .unwrap();
        let exam = db
            .create_exam(NewExam {
                user_id: user.id,
                subject: "math".into(),
                title: "Algebra".into(),
                date: "2026-01-11".into(),
                difficulty: "easy".into(),
                description: None,
                understanding: 0,
                results: 0,
            })
            .unwrap();
        let res = confirm_suggestions(&mut db, exam.id, draft);
        assert!(matches!(res, Err(AppError::Validation { field: "duration_minutes", .. })));
        assert!(db.tasks.is_empty());
    }

    #[test]
    fn suggestions_for_an_orphaned_exam_report_the_missing_owner() {
        let mut db = Db::default();
        db.insert_exam(crate::models::Exam {
            id: 0,
            user_id: 42,
            subject: "math".into(),
            title: "Algebra".into(),
            date: d(2026, 1, 11),
            difficulty: Difficulty::Easy,
            description: None,
            understanding: 0,
            results: 0,
        });
        let res = suggest_for_exam(&db, 1, d(2026, 1, 1));
        assert!(matches!(res, Err(AppError::NotFound("user"))));
    }

    #[test]
    fn confirm_unknown_exam_is_not_found() {
        let mut db = Db::default();
        let res = confirm_suggestions(&mut db, 9, SuggestionDraft::default());
        assert!(matches!(res, Err(AppError::NotFound("exam"))));
    }
}
