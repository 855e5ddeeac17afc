use std::net::SocketAddr;
use std::path::PathBuf;

use crate::store::DB_PATH;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, taken from `STUDY_PLANNER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub log_json: bool,
}

impl Config {
    /// Loads `.env` (if any) into the environment, then reads the config.
    /// Variables already set in the environment win over the file.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_raw = lookup("STUDY_PLANNER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: "STUDY_PLANNER_ADDR",
            value: addr_raw.clone(),
            reason: e.to_string(),
        })?;

        let log_json = match lookup("STUDY_PLANNER_LOG_JSON") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "STUDY_PLANNER_LOG_JSON",
                        value: v,
                        reason: "expected true or false".to_string(),
                    });
                }
            },
        };

        Ok(Config {
            addr,
            db_path: lookup("STUDY_PLANNER_DB").map_or_else(|| PathBuf::from(DB_PATH), PathBuf::from),
            static_dir: lookup("STUDY_PLANNER_STATIC").map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            log_json,
        })
    }
}
