// Error taxonomy shared by every layer of the reservation system

use crate::ids::GuestId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Identity mismatch: room is occupied by {expected}, got {actual}")]
    IdentityMismatch { expected: GuestId, actual: GuestId },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ReservationError>;

// Rejects blank input and returns the trimmed value
pub(crate) fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReservationError::InvalidArgument(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}
