use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProfileStore;
use crate::domain::{Profile, UserId};
use crate::error::StorageError;

/// Process-local store, used by the demo and by tests.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile, e.g. at account creation.
    pub async fn insert(&self, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id().clone(), profile);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Profile, StorageError> {
        self.profiles
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(user_id.clone()))
    }

    async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id().clone(), profile.clone());
        Ok(())
    }
}
