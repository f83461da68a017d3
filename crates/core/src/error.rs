use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DocstackError {
    #[error("Document with ID {0} not found")]
    DocumentNotFound(Uuid),

    #[error("Ingestion job with ID {0} not found")]
    JobNotFound(Uuid),

    #[error("User with ID {0} not found")]
    UserNotFound(Uuid),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Other(String),
}

impl DocstackError {
    /// True for any of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocstackError::DocumentNotFound(_)
                | DocstackError::JobNotFound(_)
                | DocstackError::UserNotFound(_)
        )
    }
}
