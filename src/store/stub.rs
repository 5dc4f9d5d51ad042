use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{InMemoryProfileStore, ProfileStore};
use crate::domain::{Profile, UserId};
use crate::error::StorageError;

/// In-memory store with injectable save failures and latency.
#[derive(Debug, Default)]
pub struct ProfileStoreStub {
    pub inner: InMemoryProfileStore,
    pub save_error: Mutex<Option<StorageError>>,
    pub save_delay: Mutex<Option<Duration>>,
    pub stall_after_write: Mutex<Option<Duration>>,
    pub save_calls: AtomicUsize,
}

impl ProfileStoreStub {
    pub async fn with_profile(profile: Profile) -> Self {
        let stub = Self::default();
        stub.inner.insert(profile).await;
        stub
    }

    pub fn fail_saves_with(&self, error: StorageError) {
        *self.save_error.lock().unwrap() = Some(error);
    }

    pub fn delay_saves_by(&self, delay: Duration) {
        *self.save_delay.lock().unwrap() = Some(delay);
    }

    /// Commits each save, then keeps the call pending for `delay`.
    pub fn stall_after_writing_for(&self, delay: Duration) {
        *self.stall_after_write.lock().unwrap() = Some(delay);
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for ProfileStoreStub {
    async fn load(&self, user_id: &UserId) -> Result<Profile, StorageError> {
        self.inner.load(user_id).await
    }

    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.save_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let error = self.save_error.lock().unwrap().clone();
        if let Some(error) = error {
            return Err(error);
        }
        self.inner.save(profile).await?;
        let stall = *self.stall_after_write.lock().unwrap();
        if let Some(stall) = stall {
            tokio::time::sleep(stall).await;
        }
        Ok(())
    }
}
