use thiserror::Error;

/// Malformed client input, e.g. a path argument that fails its cast.
///
/// Callers are expected to turn this into a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bad request: {message}")]
pub struct BadRequest {
    pub message: String,
}

impl BadRequest {
    pub const STATUS: u16 = 400;

    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn status(&self) -> u16 { Self::STATUS }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    BadRequest(#[from] BadRequest),
}

impl StorageError {
    /// HTTP status a caller should answer with.
    pub fn status(&self) -> u16 {
        match self {
            StorageError::Serialization(_) => 500,
            StorageError::BadRequest(e) => e.status(),
        }
    }
}
