use std::time::Duration;

use thiserror::Error;

use crate::domain::UserId;

/// Why a candidate display name was rejected. Fixable by editing the input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Display name cannot be empty")]
    Empty,
    #[error("Display name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Display name must be at most {max} characters")]
    TooLong { max: usize },
    #[error("Display name contains an invalid character: {0:?}")]
    InvalidChars(char),
    #[error("Display name contains a reserved word")]
    BannedWord,
}

/// Failures of the storage collaborator. Transient and safe to retry,
/// except `NotFound` and `Corrupt`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Profile not found: {0}")]
    NotFound(UserId),
    #[error("Profile storage unavailable: {0}")]
    Unavailable(String),
    #[error("Profile storage timed out after {0:?}")]
    Timeout(Duration),
    #[error("Stored profile is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// True when the call was abandoned before the store answered, so the
    /// write may or may not have landed.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, StorageError::Timeout(_))
    }
}

/// Errors returned by profile operations, including `update_display_name`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    #[error("Invalid display name: {0}")]
    Validation(#[from] ValidationError),
    #[error("Display name was changed recently, try again in {remaining_hours} hours")]
    CooldownActive { remaining_hours: u64 },
    #[error("Profile storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProfileError {
    /// True for failures the user cannot fix by changing input or waiting
    /// out the cooldown; a plain retry may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProfileError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_))
                | ProfileError::ActorCommunicationError(_)
        )
    }
}
