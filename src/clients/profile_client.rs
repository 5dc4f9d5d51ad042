use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{self, CooldownStatus, Profile, ValidationResult};
use crate::error::ProfileError;
use crate::messages::ProfileRequest;

/// Handle to one user's `ProfileService`. Cheap to clone; every clone talks
/// to the same actor, so updates from all of them are serialized.
#[derive(Clone, Debug)]
pub struct ProfileClient {
    sender: mpsc::Sender<ProfileRequest>,
}

impl ProfileClient {
    pub(crate) fn new(sender: mpsc::Sender<ProfileRequest>) -> Self {
        Self { sender }
    }

    /// Checks a candidate locally without contacting the actor.
    pub fn validate(&self, candidate: &str) -> ValidationResult {
        domain::validate(candidate)
    }

    pub async fn can_change_name(&self) -> Result<bool, ProfileError> {
        Ok(self.cooldown_status().await?.can_change_name)
    }

    pub async fn remaining_cooldown_hours(&self) -> Result<u64, ProfileError> {
        Ok(self.cooldown_status().await?.remaining_hours)
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ProfileError> {
        debug!("Sending shutdown");
        self.sender
            .send(ProfileRequest::Shutdown)
            .await
            .map_err(|_| ProfileError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(ProfileClient => fn current_profile() -> Profile as ProfileRequest::GetProfile, Error = ProfileError);
client_method!(ProfileClient => fn cooldown_status() -> CooldownStatus as ProfileRequest::CooldownStatus, Error = ProfileError);
client_method!(ProfileClient => fn update_display_name(candidate: String) -> Profile as ProfileRequest::UpdateDisplayName, Error = ProfileError);
client_method!(ProfileClient => fn refresh() -> Profile as ProfileRequest::Refresh, Error = ProfileError);
