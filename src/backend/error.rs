// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum CareError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A stored document exists but does not parse as the expected record shape.
    #[error("Corrupt record under key {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Purchase error: {0}")]
    PurchaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal canister error: {0}")]
    InternalError(String),

    #[error("Canister cycle balance too low for operation")]
    CycleLow,
}

impl From<validator::ValidationErrors> for CareError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CareError::InvalidInput(errors.to_string())
    }
}
