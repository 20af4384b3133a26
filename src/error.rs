//! Error type shared by the store, the overlay composer and the remote clients.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    /// A remote call was answered with 401.
    #[error("Not authorized: sign in again to continue")]
    Unauthorized,

    /// A remote call was answered with 404.
    #[error("Not found")]
    NotFound,

    /// Any other non-success status. `message` is the server's own text.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// A response (or a local input) is missing fields or is malformed.
    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("Dataset index {index} out of range (have {len})")]
    OutOfRange { index: usize, len: usize },

    /// Aggregate overlays need every dataset on dataset 0's frequency axis.
    #[error("Dataset {dataset} does not share the frequency axis of dataset 0 ({reason})")]
    InconsistentAxis { dataset: usize, reason: String },

    #[error("Preset slot {0} does not exist (slots are 1..=5)")]
    InvalidSlot(u8),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpecError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SpecError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SpecError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
