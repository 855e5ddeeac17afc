/*
Readiness and progress scoring.
Module was independently written from HTTP / Axum for testing
*/

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Db, Exam, Id, StudyTask, SubTask};

// Readiness blend weights
const TASK_WEIGHT: f64 = 0.6;
const UNDERSTANDING_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    WellPrepared,  // >= 80
    AlmostReady,   // >= 50
    StillStudying,
}

impl ReadinessLevel {
    pub fn from_score(score: i64) -> Self {
        if score >= 80 {
            ReadinessLevel::WellPrepared
        } else if score >= 50 {
            ReadinessLevel::AlmostReady
        } else {
            ReadinessLevel::StillStudying
        }
    }
}

// Derived view of one exam
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExamProgress {
    pub exam_id: Id,
    pub subject: String,
    pub title: String,
    pub date: NaiveDate,
    pub understanding: i64,
    pub results: i64,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_percent: i64, // tasks only
    pub readiness: i64,          // tasks blended with understanding
    pub level: ReadinessLevel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectSummary {
    pub subject: String,
    pub exams: usize,
    pub graded: usize,
    pub avg_understanding: i64,
    pub avg_readiness: i64,
    pub avg_results: i64, // over graded exams only, 0 when none graded
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Overview {
    pub avg_understanding: i64,
    pub avg_readiness: i64,
    pub avg_results: i64,
    pub task_progress: i64,
    pub exams: Vec<ExamProgress>,
    pub subjects: Vec<SubjectSummary>,
}

// Time accounting for one calendar day
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub tasks: usize,
    pub subtasks_total: usize,
    pub subtasks_completed: usize,
    pub required_minutes: i64,
    pub spent_minutes: i64,
}

fn percent(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as i64
}

fn minutes_for(count: usize, per_item: i64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX).saturating_mul(per_item)
}

fn avg_rounded(sum: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i64
}

// readiness (0..100):
//     with tasks    -> round((0.6 * completed/total + 0.4 * understanding/100) * 100)
//     without tasks -> round(understanding * 0.4)
// The task term is dropped, not zeroed, when there are no tasks.
pub fn readiness(total_tasks: usize, completed_tasks: usize, understanding: i64) -> i64 {
    if total_tasks == 0 {
        return (understanding as f64 * UNDERSTANDING_WEIGHT).round() as i64;
    }
    let task_ratio = completed_tasks as f64 / total_tasks as f64;
    let understanding_ratio = understanding as f64 / 100.0;
    ((TASK_WEIGHT * task_ratio + UNDERSTANDING_WEIGHT * understanding_ratio) * 100.0).round() as i64
}

pub fn exam_progress<'a>(exam: &Exam, tasks: impl IntoIterator<Item = &'a StudyTask>) -> ExamProgress {
    let (total, completed) = tasks
        .into_iter()
        .filter(|t| t.exam_id == exam.id)
        .fold((0, 0), |(total, done), t| (total + 1, done + usize::from(t.completed)));
    let score = readiness(total, completed, exam.understanding);

    ExamProgress {
        exam_id: exam.id,
        subject: exam.subject.clone(),
        title: exam.title.clone(),
        date: exam.date,
        understanding: exam.understanding,
        results: exam.results,
        total_tasks: total,
        completed_tasks: completed,
        completion_percent: percent(completed, total),
        readiness: score,
        level: ReadinessLevel::from_score(score),
    }
}

// Group by subject in first-seen order.
// Understanding and readiness average over every exam; results only over graded ones.
pub fn subject_summaries(progress: &[ExamProgress]) -> Vec<SubjectSummary> {
    struct Acc<'a> {
        subject: &'a str,
        count: usize,
        understanding: i64,
        readiness: i64,
        results: i64,
        graded: usize,
    }

    let mut groups: Vec<Acc> = Vec::new();
    for p in progress {
        let idx = match groups.iter().position(|g| g.subject == p.subject) {
            Some(idx) => idx,
            None => {
                groups.push(Acc {
                    subject: &p.subject,
                    count: 0,
                    understanding: 0,
                    readiness: 0,
                    results: 0,
                    graded: 0,
                });
                groups.len() - 1
            }
        };
        let g = &mut groups[idx];
        g.count += 1;
        g.understanding += p.understanding;
        g.readiness += p.readiness;
        if p.results > 0 {
            g.results += p.results;
            g.graded += 1;
        }
    }

    groups
        .into_iter()
        .map(|g| SubjectSummary {
            subject: g.subject.to_string(),
            exams: g.count,
            graded: g.graded,
            avg_understanding: avg_rounded(g.understanding, g.count),
            avg_readiness: avg_rounded(g.readiness, g.count),
            avg_results: avg_rounded(g.results, g.graded),
        })
        .collect()
}

pub fn overview_for_user(db: &Db, user_id: Id) -> Result<Overview, AppError> {
    db.user(user_id)?;
    let exams = db.exams_for_user(user_id);
    let tasks = db.tasks_for_user(user_id);

    let progress: Vec<ExamProgress> = exams.iter().map(|e| exam_progress(e, &tasks)).collect();
    let n = progress.len();
    let completed = tasks.iter().filter(|t| t.completed).count();

    Ok(Overview {
        avg_understanding: avg_rounded(progress.iter().map(|p| p.understanding).sum(), n),
        avg_readiness: avg_rounded(progress.iter().map(|p| p.readiness).sum(), n),
        // overall figure counts ungraded exams as 0, unlike the per-subject one
        avg_results: avg_rounded(progress.iter().map(|p| p.results).sum(), n),
        task_progress: percent(completed, tasks.len()),
        subjects: subject_summaries(&progress),
        exams: progress,
    })
}

// Per task:
//     required = max(default, subtask_count * default)
//     spent    = required if the task is completed, else completed_subtasks * default
// The task's own duration_minutes is intentionally not used.
// Minute totals saturate instead of overflowing.
pub fn day_summary<'a>(
    date: NaiveDate,
    tasks: impl IntoIterator<Item = &'a StudyTask>,
    subtasks: &[SubTask],
    default_subtask_minutes: i64,
) -> DaySummary {
    let mut summary = DaySummary {
        date,
        tasks: 0,
        subtasks_total: 0,
        subtasks_completed: 0,
        required_minutes: 0,
        spent_minutes: 0,
    };

    for task in tasks.into_iter().filter(|t| t.date == date) {
        let subs: Vec<&SubTask> = subtasks.iter().filter(|s| s.task_id == task.id).collect();
        let done = subs.iter().filter(|s| s.completed).count();
        let required = default_subtask_minutes.max(minutes_for(subs.len(), default_subtask_minutes));
        let spent = if task.completed {
            required
        } else {
            minutes_for(done, default_subtask_minutes)
        };

        summary.tasks += 1;
        summary.subtasks_total += subs.len();
        summary.subtasks_completed += done;
        summary.required_minutes = summary.required_minutes.saturating_add(required);
        summary.spent_minutes = summary.spent_minutes.saturating_add(spent);
    }
    summary
}

pub fn day_summary_for_user(db: &Db, user_id: Id, date: NaiveDate) -> Result<DaySummary, AppError> {
    let user = db.user(user_id)?;
    let tasks = db.tasks_for_user(user_id);
    let subtasks = db.subtasks_for_user(user_id);
    Ok(day_summary(date, &tasks, &subtasks, user.default_subtask_duration))
}
