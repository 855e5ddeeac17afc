/*
Schedule templates: turning dated exams/tasks into day offsets and back.

Every offset in one template counts back from a single shared anchor, the
latest date among the exams it was built from. Tasks are NOT relative to
their own exam, so replaying against a new anchor keeps the spacing between
exams as well as between each exam and its tasks.
*/

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::error::AppError;
use crate::models::{Db, Exam, Id, ScheduleTemplate, StudyTask, TemplateExam, TemplateTask};
use crate::repo::require_text;

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRequest {
    pub user_id: Id,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub exam_ids: Vec<Id>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CopyOutcome {
    pub exams: usize,
    pub tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateExamDetail {
    #[serde(flatten)]
    pub exam: TemplateExam,
    pub tasks: Vec<TemplateTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: ScheduleTemplate,
    pub exams: Vec<TemplateExamDetail>,
}

// Latest exam date in the selection. None for an empty selection.
// Several exams may share it; all of them end up at offset 0.
pub fn anchor_date<'a>(exams: impl IntoIterator<Item = &'a Exam>) -> Option<NaiveDate> {
    exams.into_iter().map(|e| e.date).max()
}

// Owner's exams for the given ids, in request order, duplicates collapsed.
fn select_exams(db: &Db, user_id: Id, exam_ids: &[Id]) -> Result<Vec<Exam>, AppError> {
    let mut selected: Vec<Exam> = Vec::with_capacity(exam_ids.len());
    for &id in exam_ids {
        if selected.iter().any(|e| e.id == id) {
            continue;
        }
        let exam = db.exam(id)?;
        if exam.user_id != user_id {
            return Err(AppError::NotFound("exam"));
        }
        selected.push(exam.clone());
    }
    Ok(selected)
}

/// Snapshot the selected exams and their tasks as a relative template.
///
/// Source exams and tasks are only read. All checks run before the first
/// row is added, so a rejected request leaves `db` untouched.
pub fn build_template(db: &mut Db, req: TemplateRequest) -> Result<ScheduleTemplate, AppError> {
    require_text("name", &req.name)?;
    db.user(req.user_id)?;
    let selected = select_exams(db, req.user_id, &req.exam_ids)?;
    let owner_tasks = db.tasks_for_user(req.user_id);

    let template = ScheduleTemplate {
        id: db.next_template_id(),
        user_id: req.user_id,
        name: req.name.trim().to_string(),
        description: req.description,
        is_public: req.is_public,
    };
    db.templates.push(template.clone());

    let Some(anchor) = anchor_date(&selected) else {
        tracing::info!(template_id = template.id, "template built without exams");
        return Ok(template);
    };

    let mut task_count = 0;
    for exam in &selected {
        let template_exam = TemplateExam {
            id: db.next_template_exam_id(),
            template_id: template.id,
            subject: exam.subject.clone(),
            title: exam.title.clone(),
            days_before_exam: dates::to_offset(anchor, exam.date),
            difficulty: exam.difficulty,
            description: exam.description.clone(),
        };

        for task in owner_tasks.iter().filter(|t| t.exam_id == exam.id) {
            let template_task = TemplateTask {
                id: db.next_template_task_id(),
                template_exam_id: template_exam.id,
                title: task.title.clone(),
                days_before_exam: dates::to_offset(anchor, task.date),
                duration_minutes: task.duration_minutes,
                order_index: task.order_index,
            };
            db.template_tasks.push(template_task);
            task_count += 1;
        }
        db.template_exams.push(template_exam);
    }

    tracing::info!(
        template_id = template.id,
        user_id = req.user_id,
        anchor = %anchor,
        exams = selected.len(),
        tasks = task_count,
        "template built"
    );
    Ok(template)
}

pub fn template_tasks_for(db: &Db, template_exam_id: Id) -> Vec<TemplateTask> {
    let mut tasks: Vec<TemplateTask> = db
        .template_tasks
        .iter()
        .filter(|t| t.template_exam_id == template_exam_id)
        .cloned()
        .collect();
    tasks.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.id.cmp(&b.id)));
    tasks
}

pub fn template_detail(db: &Db, template_id: Id, viewer: Id) -> Result<TemplateDetail, AppError> {
    let template = db.template_visible_to(template_id, viewer)?.clone();
    let exams = db
        .template_exams
        .iter()
        .filter(|e| e.template_id == template_id)
        .map(|e| TemplateExamDetail {
            exam: e.clone(),
            tasks: template_tasks_for(db, e.id),
        })
        .collect();
    Ok(TemplateDetail { template, exams })
}

/// Replay a template against `target`, the new date of its latest exam.
///
/// Purely additive and not idempotent: copying twice creates two sets.
/// Every date is resolved before the first row is added.
pub fn copy_template(db: &mut Db, template_id: Id, user_id: Id, target: NaiveDate) -> Result<CopyOutcome, AppError> {
    db.user(user_id)?;
    db.template_visible_to(template_id, user_id)?;

    let mut planned: Vec<(Exam, Vec<StudyTask>)> = Vec::new();
    for template_exam in db.template_exams.iter().filter(|e| e.template_id == template_id) {
        let exam = Exam {
            id: 0,
            user_id,
            subject: template_exam.subject.clone(),
            title: template_exam.title.clone(),
            date: dates::replay("target_date", target, template_exam.days_before_exam)?,
            difficulty: template_exam.difficulty,
            description: template_exam.description.clone(),
            understanding: 0,
            results: 0,
        };

        let mut tasks = Vec::new();
        for template_task in template_tasks_for(db, template_exam.id) {
            tasks.push(StudyTask {
                id: 0,
                user_id,
                exam_id: 0,
                title: template_task.title,
                // same anchor as the exam, never the new exam's own date
                date: dates::replay("target_date", target, template_task.days_before_exam)?,
                completed: false,
                duration_minutes: template_task.duration_minutes,
                order_index: template_task.order_index,
            });
        }
        planned.push((exam, tasks));
    }

    let mut outcome = CopyOutcome { exams: 0, tasks: 0 };
    for (exam, tasks) in planned {
        let exam = db.insert_exam(exam);
        outcome.exams += 1;
        for task in tasks {
            db.insert_task(StudyTask {
                exam_id: exam.id,
                ..task
            });
            outcome.tasks += 1;
        }
    }

    tracing::info!(
        template_id,
        user_id,
        target = %target,
        exams = outcome.exams,
        tasks = outcome.tasks,
        "template copied"
    );
    Ok(outcome)
}
