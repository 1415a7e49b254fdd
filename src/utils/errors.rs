use thiserror::Error;

/// Main error type for cdnjs resolution
#[derive(Error, Debug)]
pub enum CdnjsError {
    #[error("Repository {0} was not found")]
    RepositoryNotFound(String),

    #[error("File {file} was not found at {library}")]
    FileNotFound { file: String, library: String },

    #[error("File {0} that is trying to add is invalid")]
    InvalidFile(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CdnjsError>;
