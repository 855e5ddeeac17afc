// Sample schedule for a new user, stored relative to its last exam day and
// replayed two weeks from today.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::dates;
use crate::error::AppError;
use crate::models::{Db, Difficulty, Exam, Id, StudyTask};

pub const LEAD_DAYS: u64 = 14;

struct SampleExam {
    subject: &'static str,
    title: &'static str,
    days_before: i64,
    difficulty: Difficulty,
    description: &'static str,
    understanding: i64,
}

struct SampleTask {
    exam: usize, // index into SAMPLE_EXAMS
    title: &'static str,
    days_before: i64,
    duration_minutes: i64,
    order_index: i64,
}

const SAMPLE_EXAMS: [SampleExam; 6] = [
    SampleExam { subject: "latin", title: "Examen Latijn", days_before: 4, difficulty: Difficulty::Hard, description: "Woordenschat & Grammatica: Declinaties 1-3", understanding: 60 },
    SampleExam { subject: "dutch", title: "Examen Nederlands", days_before: 2, difficulty: Difficulty::Medium, description: "Begrijpend lezen & Spelling", understanding: 0 },
    SampleExam { subject: "science", title: "Examen Natuurkunde", days_before: 1, difficulty: Difficulty::Easy, description: "Ecosystemen & Cellen", understanding: 75 },
    SampleExam { subject: "geography", title: "Examen Aardrijkskunde", days_before: 1, difficulty: Difficulty::Easy, description: "Europese Landen & Klimaat", understanding: 70 },
    SampleExam { subject: "math", title: "Examen Wiskunde", days_before: 3, difficulty: Difficulty::Hard, description: "Algebra & Meetkunde", understanding: 45 },
    SampleExam { subject: "french", title: "Examen Frans", days_before: 0, difficulty: Difficulty::Medium, description: "Werkwoorden 'avoir' & 'être', basiswoordenschat", understanding: 50 },
];

const SAMPLE_TASKS: [SampleTask; 18] = [
    SampleTask { exam: 0, title: "Latijn: Woordenschat herhalen", days_before: 11, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 4, title: "Wiskunde: Algebra oefeningen", days_before: 10, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 5, title: "Frans: Woordenlijst", days_before: 10, duration_minutes: 30, order_index: 1 },
    SampleTask { exam: 0, title: "Latijn: Grammatica regels", days_before: 9, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 1, title: "Nederlands: Spellingregels", days_before: 8, duration_minutes: 40, order_index: 0 },
    SampleTask { exam: 4, title: "Wiskunde: Meetkunde begrippen", days_before: 7, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 3, title: "Aardrijkskunde: Hfdst 4 lezen", days_before: 7, duration_minutes: 40, order_index: 1 },
    SampleTask { exam: 0, title: "Latijn: Oefentoets verhalen", days_before: 6, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 2, title: "Natuurkunde: Toetsen maken", days_before: 6, duration_minutes: 45, order_index: 1 },
    SampleTask { exam: 0, title: "Latijn: Alles herhalen", days_before: 5, duration_minutes: 60, order_index: 0 },
    SampleTask { exam: 4, title: "Wiskunde: Proefexamen", days_before: 5, duration_minutes: 60, order_index: 1 },
    SampleTask { exam: 4, title: "Wiskunde: Formules leren", days_before: 4, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 1, title: "Nederlands: Leesoefening", days_before: 4, duration_minutes: 40, order_index: 1 },
    SampleTask { exam: 1, title: "Nederlands: Samenvatting", days_before: 3, duration_minutes: 45, order_index: 0 },
    SampleTask { exam: 2, title: "Natuurkunde: Hoofdstukken quiz", days_before: 3, duration_minutes: 45, order_index: 1 },
    SampleTask { exam: 3, title: "Aardrijkskunde: Definities", days_before: 2, duration_minutes: 40, order_index: 0 },
    SampleTask { exam: 5, title: "Frans: Werkwoorden vervoegen", days_before: 2, duration_minutes: 45, order_index: 1 },
    SampleTask { exam: 5, title: "Frans: Mondeling oefenen", days_before: 1, duration_minutes: 45, order_index: 0 },
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeedOutcome {
    pub created: bool,
    pub exams: usize,
    pub tasks: usize,
}

pub fn seed_anchor(today: NaiveDate) -> Result<NaiveDate, AppError> {
    today
        .checked_add_days(Days::new(LEAD_DAYS))
        .ok_or_else(|| AppError::validation("today", "out of range"))
}

/// Creates the sample exams and tasks for `user_id` unless the user already has exams.
pub fn seed_user(db: &mut Db, user_id: Id, today: NaiveDate) -> Result<SeedOutcome, AppError> {
    db.user(user_id)?;
    if db.exams.iter().any(|e| e.user_id == user_id) {
        tracing::info!(user_id, "seed skipped, user already has exams");
        return Ok(SeedOutcome {
            created: false,
            exams: 0,
            tasks: 0,
        });
    }

    let anchor = seed_anchor(today)?;
    let mut exam_ids = Vec::with_capacity(SAMPLE_EXAMS.len());
    for sample in &SAMPLE_EXAMS {
        let exam = db.insert_exam(Exam {
            id: 0,
            user_id,
            subject: sample.subject.to_string(),
            title: sample.title.to_string(),
            date: dates::replay("date", anchor, sample.days_before)?,
            difficulty: sample.difficulty,
            description: Some(sample.description.to_string()),
            understanding: sample.understanding,
            results: 0,
        });
        exam_ids.push(exam.id);
    }

    for sample in &SAMPLE_TASKS {
        db.insert_task(StudyTask {
            id: 0,
            user_id,
            exam_id: exam_ids[sample.exam],
            title: sample.title.to_string(),
            date: dates::replay("date", anchor, sample.days_before)?,
            completed: false,
            duration_minutes: sample.duration_minutes,
            order_index: sample.order_index,
        });
    }

    tracing::info!(user_id, exams = SAMPLE_EXAMS.len(), tasks = SAMPLE_TASKS.len(), "seed data created");
    Ok(SeedOutcome {
        created: true,
        exams: SAMPLE_EXAMS.len(),
        tasks: SAMPLE_TASKS.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::NewUser;
    use pretty_assertions::assert_eq;

    fn db_with_user() -> (Db, Id) {
        let mut db = Db::default();
        let user = db
            .create_user(NewUser {
                name: "Noor".into(),
                role: None,
                language: None,
                default_subtask_duration: None,
            })
            .unwrap();
        (db, user.id)
    }

    #[test]
    fn sample_is_replayed_two_weeks_out() {
        let (mut db, uid) = db_with_user();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let out = seed_user(&mut db, uid, today).unwrap();
        assert_eq!(out, SeedOutcome { created: true, exams: 6, tasks: 18 });

        let exams = db.exams_for_user(uid);
        assert_eq!(exams.last().map(|e| e.date), NaiveDate::from_ymd_opt(2026, 5, 15));
        assert_eq!(exams.first().map(|e| e.subject.as_str()), Some("latin"));

        let tasks = db.tasks_for_user(uid);
        assert_eq!(tasks.first().map(|t| t.date), NaiveDate::from_ymd_opt(2026, 5, 4));
        // every task is studied before its exam
        for t in &tasks {
            let exam = db.exam(t.exam_id).unwrap();
            assert!(t.date < exam.date, "{} on {}", t.title, t.date);
        }
    }

    #[test]
    fn second_seed_is_a_no_op() {
        let (mut db, uid) = db_with_user();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        seed_user(&mut db, uid, today).unwrap();
        let again = seed_user(&mut db, uid, today).unwrap();
        assert!(!again.created);
        assert_eq!(db.exams.len(), 6);
        assert_eq!(db.tasks.len(), 18);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let mut db = Db::default();
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert!(matches!(seed_user(&mut db, 3, today), Err(AppError::NotFound("user"))));
    }
}
