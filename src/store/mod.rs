//! Profile persistence.
//!
//! The actor treats every store call as potentially slow and bounds it with a
//! timeout, so implementations do not need their own.

mod file;
mod memory;
#[cfg(test)]
pub(crate) mod stub;

pub use file::JsonFileProfileStore;
pub use memory::InMemoryProfileStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Profile, UserId};
use crate::error::StorageError;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns [`StorageError::NotFound`] when no profile exists for `user_id`.
    async fn load(&self, user_id: &UserId) -> Result<Profile, StorageError>;

    /// Replaces the stored profile. A failed save must leave the previous
    /// profile intact.
    async fn save(&self, profile: &Profile) -> Result<(), StorageError>;
}

/// Runs a store call, turning an overrun of `timeout` into
/// [`StorageError::Timeout`]. The call is dropped when the timeout fires.
pub async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, StorageError>>,
) -> Result<T, StorageError> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| StorageError::Timeout(timeout))?
}
