use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::Db;

pub const DB_PATH: &str = "data/db.json";

// A missing file is an empty dataset; anything else unreadable is an error.
pub fn load_db(path: &Path) -> Result<Db, AppError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Db::default()),
        Err(e) => return Err(e.into()),
    };
    let db: Db = serde_json::from_str(&text)?;
    Ok(db)
}

pub fn save_db(path: &Path, db: &Db) -> Result<(), AppError> {
    let mut tmp_path = OsString::from(path.as_os_str());
    tmp_path.push(".tmp");
    let text = serde_json::to_string_pretty(db)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// In-memory dataset mirrored to a JSON file.
///
/// Every `write` is all-or-nothing: the closure works on a draft copy, the
/// draft is saved, and only a successful save replaces the live dataset.
pub struct Store {
    path: PathBuf,
    db: Mutex<Db>,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let db = load_db(&path)?;
        tracing::info!(
            path = %path.display(),
            users = db.users.len(),
            exams = db.exams.len(),
            tasks = db.tasks.len(),
            templates = db.templates.len(),
            "store opened"
        );
        Ok(Store {
            path,
            db: Mutex::new(db),
        })
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Db) -> Result<T, AppError>) -> Result<T, AppError> {
        let db = self.db.lock().await;
        f(&db)
    }

    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut Db) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut db = self.db.lock().await;
        let mut draft = db.clone();
        let out = f(&mut draft)?;

        // File IO runs on the blocking pool; the lock stays held so writes keep their order.
        let path = self.path.clone();
        let (saved, draft) = tokio::task::spawn_blocking(move || {
            let saved = save_db(&path, &draft);
            (saved, draft)
        })
        .await
        .map_err(|e| io::Error::other(format!("save task join: {e}")))?;

        if let Err(e) = saved {
            tracing::warn!(path = %self.path.display(), error = %e, "save failed, changes discarded");
            return Err(e);
        }
        *db = draft;
        tracing::debug!(path = %self.path.display(), "store saved");
        Ok(out)
    }
}
