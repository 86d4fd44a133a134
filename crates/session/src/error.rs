use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Token endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Token request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}
