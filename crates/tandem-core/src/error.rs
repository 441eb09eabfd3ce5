//! Error types for Tandem

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The caller broke the engine's calling contract (e.g. non-finite capacity)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Goal source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
