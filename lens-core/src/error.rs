use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Log setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
