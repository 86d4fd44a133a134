use thiserror::Error;

pub type Result<T> = std::result::Result<T, SuggestError>;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Suggestions endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Suggestion request failed: {0}")]
    Transport(String),

    #[error("Invalid suggestions payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
