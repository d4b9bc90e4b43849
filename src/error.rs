use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid table data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Terminal too small (minimum 60x15)")]
    TerminalTooSmall,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
