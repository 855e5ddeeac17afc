use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub type Id = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Nl,
    Fr,
    En,
}

impl Language {
    // Appended to the title of a duplicated task.
    pub fn copy_suffix(self) -> &'static str {
        match self {
            Language::Nl => " (kopie)",
            Language::Fr => " (copie)",
            Language::En => " (copy)",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::validation(
                "difficulty",
                format!("'{other}' must be one of easy, medium, hard"),
            )),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(AppError::validation(
                "role",
                format!("'{other}' must be 'student' or 'teacher'"),
            )),
        }
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nl" => Ok(Language::Nl),
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(AppError::validation(
                "language",
                format!("'{other}' must be 'nl', 'fr', or 'en'"),
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub role: Role,
    pub role_confirmed: bool,
    pub language: Language,
    pub default_subtask_duration: i64, // minutes
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exam {
    pub id: Id,
    pub user_id: Id,
    pub subject: String,
    pub title: String,
    pub date: NaiveDate,
    pub difficulty: Difficulty,
    pub description: Option<String>,
    pub understanding: i64, // 0..=100, self-reported
    pub results: i64,       // 0..=100, 0 = not graded yet
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyTask {
    pub id: Id,
    pub user_id: Id,
    pub exam_id: Id,
    pub title: String,
    pub date: NaiveDate, // day the task is studied, not the exam day
    pub completed: bool,
    pub duration_minutes: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubTask {
    pub id: Id,
    pub task_id: Id,
    pub title: String,
    pub completed: bool,
    pub duration_minutes: i64,
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleTemplate {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

// Relative exam. days_before_exam counts back from the template's shared anchor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateExam {
    pub id: Id,
    pub template_id: Id,
    pub subject: String,
    pub title: String,
    pub days_before_exam: i64,
    pub difficulty: Difficulty,
    pub description: Option<String>,
}

// Relative task. Same anchor as its template's exams, not its own exam's date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateTask {
    pub id: Id,
    pub template_exam_id: Id,
    pub title: String,
    pub days_before_exam: i64,
    pub duration_minutes: i64,
    pub order_index: i64,
}

/// Last issued id per entity kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSequences {
    pub users: Id,
    pub exams: Id,
    pub tasks: Id,
    pub subtasks: Id,
    pub templates: Id,
    pub template_exams: Id,
    pub template_tasks: Id,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Db {
    pub sequences: IdSequences,
    pub users: Vec<User>,
    pub exams: Vec<Exam>,
    pub tasks: Vec<StudyTask>,
    pub subtasks: Vec<SubTask>,
    pub templates: Vec<ScheduleTemplate>,
    pub template_exams: Vec<TemplateExam>,
    pub template_tasks: Vec<TemplateTask>,
}
