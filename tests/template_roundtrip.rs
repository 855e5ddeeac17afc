use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use study_planner::error::AppError;
use study_planner::models::Id;
use study_planner::repo::{NewExam, NewTask, NewUser};
use study_planner::store::Store;
use study_planner::templates::{self, TemplateRequest};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        role: None,
        language: None,
        default_subtask_duration: None,
    }
}

fn new_exam(user_id: Id, subject: &str, date: &str) -> NewExam {
    NewExam {
        user_id,
        subject: subject.to_string(),
        title: format!("Exam {subject}"),
        date: date.to_string(),
        difficulty: "medium".to_string(),
        description: None,
        understanding: 50,
        results: 0,
    }
}

fn new_task(user_id: Id, exam_id: Id, title: &str, date: &str, order_index: i64) -> NewTask {
    NewTask {
        user_id,
        exam_id,
        title: title.to_string(),
        date: date.to_string(),
        completed: true,
        duration_minutes: 45,
        order_index,
    }
}

#[tokio::test]
async fn public_template_is_replayed_for_another_user_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let (author, student, template_id) = {
        let store = Store::open(&path).unwrap();
        store
            .write(|db| {
                let author = db.create_user(new_user("Mevr. Peeters"))?;
                let student = db.create_user(new_user("Lotte"))?;
                let math = db.create_exam(new_exam(author.id, "math", "2025-12-01"))?;
                let latin = db.create_exam(new_exam(author.id, "latin", "2025-12-10"))?;
                db.create_task(new_task(author.id, math.id, "Formulas", "2025-11-25", 0))?;
                db.create_task(new_task(author.id, latin.id, "Vocabulary", "2025-12-05", 0))?;
                db.create_task(new_task(author.id, latin.id, "Grammar", "2025-12-05", 1))?;

                let template = templates::build_template(
                    db,
                    TemplateRequest {
                        user_id: author.id,
                        name: "Winter exams".to_string(),
                        description: Some("December block".to_string()),
                        is_public: true,
                        exam_ids: vec![math.id, latin.id],
                    },
                )?;
                Ok((author.id, student.id, template.id))
            })
            .await
            .unwrap()
    };

    // everything below runs against what was persisted
    let store = Store::open(&path).unwrap();

    let detail = store
        .read(|db| templates::template_detail(db, template_id, student))
        .await
        .unwrap();
    let offsets: Vec<(String, i64)> = detail
        .exams
        .iter()
        .map(|e| (e.exam.subject.clone(), e.exam.days_before_exam))
        .collect();
    assert_eq!(offsets, vec![("math".to_string(), 9), ("latin".to_string(), 0)]);
    assert_eq!(detail.exams[1].tasks.len(), 2);
    assert_eq!(detail.exams[1].tasks[0].days_before_exam, 5);

    let outcome = store
        .write(|db| templates::copy_template(db, template_id, student, d("2026-01-20")))
        .await
        .unwrap();
    assert_eq!((outcome.exams, outcome.tasks), (2, 3));

    let store = Store::open(&path).unwrap();
    let (exams, tasks) = store
        .read(|db| Ok((db.exams_for_user(student), db.tasks_for_user(student))))
        .await
        .unwrap();

    let exam_dates: Vec<NaiveDate> = exams.iter().map(|e| e.date).collect();
    assert_eq!(exam_dates, vec![d("2026-01-11"), d("2026-01-20")]);
    assert!(exams.iter().all(|e| e.understanding == 0 && e.results == 0));

    let task_dates: Vec<(&str, NaiveDate)> = tasks.iter().map(|t| (t.title.as_str(), t.date)).collect();
    assert_eq!(
        task_dates,
        vec![
            ("Formulas", d("2026-01-05")),
            ("Vocabulary", d("2026-01-15")),
            ("Grammar", d("2026-01-15")),
        ]
    );
    assert!(tasks.iter().all(|t| !t.completed && t.duration_minutes == 45));

    // the source rows are untouched
    let author_tasks = store.read(|db| Ok(db.tasks_for_user(author))).await.unwrap();
    assert!(author_tasks.iter().all(|t| t.completed));
    assert_eq!(author_tasks[0].date, d("2025-11-25"));
}

#[tokio::test]
async fn rejected_build_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let store = Store::open(&path).unwrap();

    let (alice, bobs_exam) = store
        .write(|db| {
            let alice = db.create_user(new_user("Alice"))?;
            let bob = db.create_user(new_user("Bob"))?;
            let exam = db.create_exam(new_exam(bob.id, "history", "2026-02-02"))?;
            Ok((alice.id, exam.id))
        })
        .await
        .unwrap();

    let res = store
        .write(|db| {
            templates::build_template(
                db,
                TemplateRequest {
                    user_id: alice,
                    name: "Stolen".to_string(),
                    description: None,
                    is_public: false,
                    exam_ids: vec![bobs_exam],
                },
            )
        })
        .await;
    assert!(matches!(res, Err(AppError::NotFound("exam"))));

    let reopened = Store::open(&path).unwrap();
    let count = reopened.read(|db| Ok(db.templates.len())).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn private_template_cannot_be_copied_or_deleted_by_others() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).unwrap();

    let (owner, other, template_id) = store
        .write(|db| {
            let owner = db.create_user(new_user("Owner"))?;
            let other = db.create_user(new_user("Other"))?;
            let exam = db.create_exam(new_exam(owner.id, "music", "2026-03-03"))?;
            let template = templates::build_template(
                db,
                TemplateRequest {
                    user_id: owner.id,
                    name: "Mine".to_string(),
                    description: None,
                    is_public: false,
                    exam_ids: vec![exam.id],
                },
            )?;
            Ok((owner.id, other.id, template.id))
        })
        .await
        .unwrap();

    let copy = store
        .write(|db| templates::copy_template(db, template_id, other, d("2026-06-01")))
        .await;
    assert!(matches!(copy, Err(AppError::NotFound("template"))));

    let delete = store.write(|db| db.delete_template(template_id, other)).await;
    assert!(matches!(delete, Err(AppError::NotAuthorized(_))));

    store.write(|db| db.delete_template(template_id, owner)).await.unwrap();
    let left = store
        .read(|db| Ok((db.templates.len(), db.template_exams.len())))
        .await
        .unwrap();
    assert_eq!(left, (0, 0));
}
