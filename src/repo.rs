// --------------------------------------------------
// Row-level operations on the dataset.
//
// Responsibilities:
// - Create / read / update / delete users, exams, tasks, subtasks
// - Cascade deletes (exam -> tasks -> subtasks, template -> relative rows)
// - Task move and duplicate
// - Field validation before any row is touched
//
// Everything here is synchronous and works on a `Db` borrowed from the Store.
// --------------------------------------------------

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates;
use crate::error::AppError;
use crate::models::{
    Db, Difficulty, Exam, Id, Language, Role, ScheduleTemplate, StudyTask, SubTask, User,
};

pub const DEFAULT_DURATION_MIN: i64 = 60;
// One study item never spans more than a day.
pub const MAX_DURATION_MIN: i64 = 24 * 60;

fn bump(seq: &mut Id) -> Id {
    *seq += 1;
    *seq
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_percent(field: &'static str, value: i64) -> Result<(), AppError> {
    if !(0..=100).contains(&value) {
        return Err(AppError::validation(field, format!("{value} must be within 0..=100")));
    }
    Ok(())
}

pub(crate) fn require_minutes(field: &'static str, value: i64) -> Result<(), AppError> {
    if !(1..=MAX_DURATION_MIN).contains(&value) {
        return Err(AppError::validation(
            field,
            format!("{value} must be between 1 and {MAX_DURATION_MIN} minutes"),
        ));
    }
    Ok(())
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MIN
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub role: Option<String>,
    pub language: Option<String>,
    pub default_subtask_duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExam {
    pub user_id: Id,
    pub subject: String,
    pub title: String,
    pub date: String, // "YYYY-MM-DD"
    pub difficulty: String,
    pub description: Option<String>,
    #[serde(default)]
    pub understanding: i64,
    #[serde(default)]
    pub results: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamUpdate {
    pub subject: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub understanding: Option<i64>,
    pub results: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub user_id: Id,
    pub exam_id: Id,
    pub title: String,
    pub date: String, // "YYYY-MM-DD"
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub completed: Option<bool>,
    pub duration_minutes: Option<i64>,
    pub order_index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubTask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubTaskUpdate {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub duration_minutes: Option<i64>,
    pub order_index: Option<i64>,
}

impl Db {
    // -----------------------------
    // users
    // -----------------------------

    pub fn user(&self, id: Id) -> Result<&User, AppError> {
        self.users.iter().find(|u| u.id == id).ok_or(AppError::NotFound("user"))
    }

    fn user_mut(&mut self, id: Id) -> Result<&mut User, AppError> {
        self.users.iter_mut().find(|u| u.id == id).ok_or(AppError::NotFound("user"))
    }

    pub fn users_by_name(&self) -> Vec<User> {
        let mut users = self.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        users
    }

    pub fn create_user(&mut self, input: NewUser) -> Result<User, AppError> {
        require_text("name", &input.name)?;
        let role = match input.role.as_deref() {
            Some(r) => r.parse::<Role>()?,
            None => Role::default(),
        };
        let language = match input.language.as_deref() {
            Some(l) => l.parse::<Language>()?,
            None => Language::default(),
        };
        let default_subtask_duration = input.default_subtask_duration.unwrap_or(DEFAULT_DURATION_MIN);
        require_minutes("default_subtask_duration", default_subtask_duration)?;

        let user = User {
            id: bump(&mut self.sequences.users),
            name: input.name.trim().to_string(),
            role,
            role_confirmed: false,
            language,
            default_subtask_duration,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user_preference(&mut self, id: Id, minutes: i64) -> Result<User, AppError> {
        require_minutes("default_subtask_duration", minutes)?;
        let user = self.user_mut(id)?;
        user.default_subtask_duration = minutes;
        Ok(user.clone())
    }

    pub fn update_user_language(&mut self, id: Id, language: &str) -> Result<User, AppError> {
        let language = language.parse::<Language>()?;
        let user = self.user_mut(id)?;
        user.language = language;
        Ok(user.clone())
    }

    pub fn update_user_role(&mut self, id: Id, role: &str) -> Result<User, AppError> {
        let role = role.parse::<Role>()?;
        let user = self.user_mut(id)?;
        user.role = role;
        user.role_confirmed = true;
        Ok(user.clone())
    }

    // -----------------------------
    // exams
    // -----------------------------

    pub fn exam(&self, id: Id) -> Result<&Exam, AppError> {
        self.exams.iter().find(|e| e.id == id).ok_or(AppError::NotFound("exam"))
    }

    pub fn exams_for_user(&self, user_id: Id) -> Vec<Exam> {
        let mut exams: Vec<Exam> = self.exams.iter().filter(|e| e.user_id == user_id).cloned().collect();
        exams.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        exams
    }

    // Assigns a fresh id; the incoming id is ignored.
    pub(crate) fn insert_exam(&mut self, exam: Exam) -> Exam {
        let exam = Exam {
            id: bump(&mut self.sequences.exams),
            ..exam
        };
        self.exams.push(exam.clone());
        exam
    }

    pub fn create_exam(&mut self, input: NewExam) -> Result<Exam, AppError> {
        require_text("title", &input.title)?;
        require_text("subject", &input.subject)?;
        require_percent("understanding", input.understanding)?;
        require_percent("results", input.results)?;
        let date = dates::parse_iso("date", &input.date)?;
        let difficulty = input.difficulty.parse::<Difficulty>()?;
        self.user(input.user_id)?;

        Ok(self.insert_exam(Exam {
            id: 0,
            user_id: input.user_id,
            subject: input.subject,
            title: input.title,
            date,
            difficulty,
            description: input.description,
            understanding: input.understanding,
            results: input.results,
        }))
    }

    pub fn update_exam(&mut self, id: Id, input: ExamUpdate) -> Result<Exam, AppError> {
        if let Some(title) = &input.title {
            require_text("title", title)?;
        }
        if let Some(subject) = &input.subject {
            require_text("subject", subject)?;
        }
        if let Some(v) = input.understanding {
            require_percent("understanding", v)?;
        }
        if let Some(v) = input.results {
            require_percent("results", v)?;
        }
        let date = input.date.as_deref().map(|d| dates::parse_iso("date", d)).transpose()?;
        let difficulty = input.difficulty.as_deref().map(str::parse::<Difficulty>).transpose()?;

        let exam = self.exams.iter_mut().find(|e| e.id == id).ok_or(AppError::NotFound("exam"))?;
        if let Some(subject) = input.subject {
            exam.subject = subject;
        }
        if let Some(title) = input.title {
            exam.title = title;
        }
        if let Some(date) = date {
            exam.date = date;
        }
        if let Some(difficulty) = difficulty {
            exam.difficulty = difficulty;
        }
        if let Some(description) = input.description {
            exam.description = Some(description);
        }
        if let Some(v) = input.understanding {
            exam.understanding = v;
        }
        if let Some(v) = input.results {
            exam.results = v;
        }
        Ok(exam.clone())
    }

    // Removes the exam, its tasks and their subtasks.
    pub fn delete_exam(&mut self, id: Id) -> Result<(), AppError> {
        self.exam(id)?;
        let task_ids: Vec<Id> = self.tasks.iter().filter(|t| t.exam_id == id).map(|t| t.id).collect();
        self.subtasks.retain(|s| !task_ids.contains(&s.task_id));
        self.tasks.retain(|t| t.exam_id != id);
        self.exams.retain(|e| e.id != id);
        Ok(())
    }

    // -----------------------------
    // study tasks
    // -----------------------------

    pub fn task(&self, id: Id) -> Result<&StudyTask, AppError> {
        self.tasks.iter().find(|t| t.id == id).ok_or(AppError::NotFound("task"))
    }

    fn task_mut(&mut self, id: Id) -> Result<&mut StudyTask, AppError> {
        self.tasks.iter_mut().find(|t| t.id == id).ok_or(AppError::NotFound("task"))
    }

    pub fn tasks_for_user(&self, user_id: Id) -> Vec<StudyTask> {
        let mut tasks: Vec<StudyTask> = self.tasks.iter().filter(|t| t.user_id == user_id).cloned().collect();
        tasks.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.order_index.cmp(&b.order_index))
                .then(a.id.cmp(&b.id))
        });
        tasks
    }

    pub fn tasks_for_exam(&self, exam_id: Id) -> Vec<&StudyTask> {
        self.tasks.iter().filter(|t| t.exam_id == exam_id).collect()
    }

    pub(crate) fn insert_task(&mut self, task: StudyTask) -> StudyTask {
        let task = StudyTask {
            id: bump(&mut self.sequences.tasks),
            ..task
        };
        self.tasks.push(task.clone());
        task
    }

    pub fn create_task(&mut self, input: NewTask) -> Result<StudyTask, AppError> {
        require_text("title", &input.title)?;
        require_minutes("duration_minutes", input.duration_minutes)?;
        let date = dates::parse_iso("date", &input.date)?;
        self.user(input.user_id)?;
        let exam = self.exam(input.exam_id)?;
        if exam.user_id != input.user_id {
            return Err(AppError::NotFound("exam"));
        }

        Ok(self.insert_task(StudyTask {
            id: 0,
            user_id: input.user_id,
            exam_id: input.exam_id,
            title: input.title,
            date,
            completed: input.completed,
            duration_minutes: input.duration_minutes,
            order_index: input.order_index,
        }))
    }

    pub fn update_task(&mut self, id: Id, input: TaskUpdate) -> Result<StudyTask, AppError> {
        if let Some(title) = &input.title {
            require_text("title", title)?;
        }
        if let Some(v) = input.duration_minutes {
            require_minutes("duration_minutes", v)?;
        }
        let date = input.date.as_deref().map(|d| dates::parse_iso("date", d)).transpose()?;

        let task = self.task_mut(id)?;
        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(date) = date {
            task.date = date;
        }
        if let Some(completed) = input.completed {
            task.completed = completed;
        }
        if let Some(v) = input.duration_minutes {
            task.duration_minutes = v;
        }
        if let Some(v) = input.order_index {
            task.order_index = v;
        }
        Ok(task.clone())
    }

    // Moves a task to another day. Without an explicit index it goes last on that day.
    pub fn move_task(&mut self, id: Id, date: NaiveDate, order_index: Option<i64>) -> Result<StudyTask, AppError> {
        let owner = self.task(id)?.user_id;
        let order_index = order_index.unwrap_or_else(|| {
            self.tasks
                .iter()
                .filter(|t| t.user_id == owner && t.date == date && t.id != id)
                .map(|t| t.order_index)
                .max()
                .map_or(0, |max| max + 1)
        });

        let task = self.task_mut(id)?;
        task.date = date;
        task.order_index = order_index;
        Ok(task.clone())
    }

    // Removes the task and its subtasks.
    pub fn delete_task(&mut self, id: Id) -> Result<(), AppError> {
        self.task(id)?;
        self.subtasks.retain(|s| s.task_id != id);
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    // Copy with a suffixed title and fresh subtasks (completed reset).
    pub fn duplicate_task(&mut self, id: Id) -> Result<StudyTask, AppError> {
        let original = self.task(id)?.clone();
        let language = self.user(original.user_id)?.language;

        let copy = self.insert_task(StudyTask {
            title: format!("{}{}", original.title, language.copy_suffix()),
            ..original
        });

        for sub in self.subtasks_for_task(id) {
            self.insert_subtask(SubTask {
                id: 0,
                task_id: copy.id,
                title: sub.title,
                completed: false,
                duration_minutes: sub.duration_minutes,
                order_index: sub.order_index,
            });
        }
        Ok(copy)
    }

    // -----------------------------
    // subtasks
    // -----------------------------

    pub fn subtasks_for_task(&self, task_id: Id) -> Vec<SubTask> {
        let mut subs: Vec<SubTask> = self.subtasks.iter().filter(|s| s.task_id == task_id).cloned().collect();
        subs.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.id.cmp(&b.id)));
        subs
    }

    pub fn subtasks_for_user(&self, user_id: Id) -> Vec<SubTask> {
        self.tasks_for_user(user_id)
            .iter()
            .flat_map(|t| self.subtasks_for_task(t.id))
            .collect()
    }

    fn insert_subtask(&mut self, sub: SubTask) -> SubTask {
        let sub = SubTask {
            id: bump(&mut self.sequences.subtasks),
            ..sub
        };
        self.subtasks.push(sub.clone());
        sub
    }

    pub fn create_subtask(&mut self, task_id: Id, input: NewSubTask) -> Result<SubTask, AppError> {
        require_text("title", &input.title)?;
        require_minutes("duration_minutes", input.duration_minutes)?;
        self.task(task_id)?;

        Ok(self.insert_subtask(SubTask {
            id: 0,
            task_id,
            title: input.title,
            completed: input.completed,
            duration_minutes: input.duration_minutes,
            order_index: input.order_index,
        }))
    }

    pub fn update_subtask(&mut self, id: Id, input: SubTaskUpdate) -> Result<SubTask, AppError> {
        if let Some(title) = &input.title {
            require_text("title", title)?;
        }
        if let Some(v) = input.duration_minutes {
            require_minutes("duration_minutes", v)?;
        }

        let sub = self.subtasks.iter_mut().find(|s| s.id == id).ok_or(AppError::NotFound("subtask"))?;
        if let Some(title) = input.title {
            sub.title = title;
        }
        if let Some(completed) = input.completed {
            sub.completed = completed;
        }
        if let Some(v) = input.duration_minutes {
            sub.duration_minutes = v;
        }
        if let Some(v) = input.order_index {
            sub.order_index = v;
        }
        Ok(sub.clone())
    }

    pub fn delete_subtask(&mut self, id: Id) -> Result<(), AppError> {
        let before = self.subtasks.len();
        self.subtasks.retain(|s| s.id != id);
        if self.subtasks.len() == before {
            return Err(AppError::NotFound("subtask"));
        }
        Ok(())
    }

    // -----------------------------
    // templates (rows only, building lives in templates.rs)
    // -----------------------------

    pub fn template(&self, id: Id) -> Result<&ScheduleTemplate, AppError> {
        self.templates.iter().find(|t| t.id == id).ok_or(AppError::NotFound("template"))
    }

    // Private templates of other users look like missing ones.
    pub fn template_visible_to(&self, id: Id, user_id: Id) -> Result<&ScheduleTemplate, AppError> {
        let template = self.template(id)?;
        if template.user_id != user_id && !template.is_public {
            return Err(AppError::NotFound("template"));
        }
        Ok(template)
    }

    pub fn public_templates(&self) -> Vec<ScheduleTemplate> {
        self.templates.iter().filter(|t| t.is_public).cloned().collect()
    }

    // Own templates first, then public ones owned by others.
    pub fn templates_for_user(&self, user_id: Id) -> Vec<ScheduleTemplate> {
        let own = self.templates.iter().filter(|t| t.user_id == user_id);
        let shared = self.templates.iter().filter(|t| t.is_public && t.user_id != user_id);
        own.chain(shared).cloned().collect()
    }

    pub(crate) fn next_template_id(&mut self) -> Id {
        bump(&mut self.sequences.templates)
    }

    pub(crate) fn next_template_exam_id(&mut self) -> Id {
        bump(&mut self.sequences.template_exams)
    }

    pub(crate) fn next_template_task_id(&mut self) -> Id {
        bump(&mut self.sequences.template_tasks)
    }

    pub fn delete_template(&mut self, id: Id, caller: Id) -> Result<(), AppError> {
        let template = self.template(id)?;
        if template.user_id != caller {
            return Err(AppError::NotAuthorized(
                "template belongs to another user".to_string(),
            ));
        }
        let exam_ids: Vec<Id> = self
            .template_exams
            .iter()
            .filter(|e| e.template_id == id)
            .map(|e| e.id)
            .collect();
        self.template_tasks.retain(|t| !exam_ids.contains(&t.template_exam_id));
        self.template_exams.retain(|e| e.template_id != id);
        self.templates.retain(|t| t.id != id);
        Ok(())
    }
}
