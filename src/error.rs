use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskListError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("Stored data under '{key}' is corrupt: {message}")]
    CorruptData { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Position {index} is out of range for {len} task(s)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid {kind} '{value}' (expected one of: {expected})")]
    InvalidPreference {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown color '{0}' (see `tasklist colors`)")]
    UnknownColor(String),

    #[error("No task with ID: {0}")]
    TaskNotFound(String),
}

impl From<serde_json::Error> for TaskListError {
    fn from(e: serde_json::Error) -> Self {
        TaskListError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskListError>;
