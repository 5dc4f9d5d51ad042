use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::ProfileClient;
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::domain::{CooldownStatus, DisplayName, Profile};
use crate::error::{ProfileError, StorageError};
use crate::messages::{ProfileRequest, ServiceResponse};
use crate::store::{self, ProfileStore};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// Owns one user's profile and is its only writer.
///
/// Requests are handled one at a time, so two renames submitted together are
/// applied in order and the second sees the first's committed state. The
/// cached profile is replaced only after the store accepted the new one.
///
/// A save that timed out may still land in the store, so the cache is marked
/// stale and reloaded before it is used again.
pub struct ProfileService {
    receiver: mpsc::Receiver<ProfileRequest>,
    profile: Profile,
    stale: bool,
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl ProfileService {
    pub fn new(
        profile: Profile,
        store: Arc<dyn ProfileStore>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> (Self, ProfileClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        let service = Self {
            receiver,
            profile,
            stale: false,
            store,
            clock,
            config,
        };
        let client = ProfileClient::new(sender);
        (service, client)
    }

    /// Main actor loop. Ends on `Shutdown` or when every client is dropped.
    #[instrument(name = "profile_service", fields(user_id = %self.profile.user_id()), skip(self))]
    pub async fn run(mut self) {
        info!("ProfileService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ProfileRequest::GetProfile { respond_to } => {
                    self.handle_get_profile(respond_to).await;
                }
                ProfileRequest::CooldownStatus { respond_to } => {
                    self.handle_cooldown_status(respond_to).await;
                }
                ProfileRequest::UpdateDisplayName {
                    candidate,
                    respond_to,
                } => {
                    self.handle_update_display_name(candidate, respond_to).await;
                }
                ProfileRequest::Refresh { respond_to } => {
                    self.handle_refresh(respond_to).await;
                }
                ProfileRequest::Shutdown => {
                    info!("ProfileService shutting down");
                    break;
                }
            }
        }

        info!("ProfileService stopped");
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_get_profile(&mut self, respond_to: ServiceResponse<Profile, ProfileError>) {
        debug!("Processing get_profile request");
        if let Err(e) = self.reconcile().await {
            send_error!(respond_to, e);
        }
        let _ = respond_to.send(Ok(self.profile.clone()));
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_cooldown_status(
        &mut self,
        respond_to: ServiceResponse<CooldownStatus, ProfileError>,
    ) {
        debug!("Processing cooldown_status request");
        if let Err(e) = self.reconcile().await {
            send_error!(respond_to, e);
        }
        let status = self.config.cooldown.status(&self.profile, self.clock.now());
        debug!(
            can_change_name = status.can_change_name,
            remaining_hours = status.remaining_hours,
            "Cooldown evaluated"
        );
        let _ = respond_to.send(Ok(status));
    }

    /// Validates, checks the cooldown against a fresh clock read, then
    /// persists. Nothing earlier callers observed is trusted.
    #[instrument(skip(self, candidate, respond_to))]
    async fn handle_update_display_name(
        &mut self,
        candidate: String,
        respond_to: ServiceResponse<Profile, ProfileError>,
    ) {
        debug!("Processing update_display_name request");

        let name = match DisplayName::parse(&candidate) {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "Validation failed");
                send_error!(respond_to, e.into());
            }
        };

        if let Err(e) = self.reconcile().await {
            send_error!(respond_to, e);
        }

        if &name == self.profile.display_name() {
            debug!("Display name unchanged, nothing to persist");
            let _ = respond_to.send(Ok(self.profile.clone()));
            return;
        }

        let now = self.clock.now();
        let status = self.config.cooldown.status(&self.profile, now);
        if !status.can_change_name {
            warn!(remaining_hours = status.remaining_hours, "Rename blocked by cooldown");
            send_error!(
                respond_to,
                ProfileError::CooldownActive {
                    remaining_hours: status.remaining_hours,
                }
            );
        }

        let updated = self.profile.renamed(name, now);
        if let Err(e) = store::with_timeout(self.config.store_timeout, self.store.save(&updated)).await
        {
            if e.outcome_unknown() {
                warn!("Save outcome unknown, profile will be reloaded before next use");
                self.stale = true;
            }
            error!(error = %e, "Saving profile failed");
            send_error!(respond_to, e.into());
        }

        info!(display_name = %updated.display_name(), "Display name updated");
        self.profile = updated.clone();
        let _ = respond_to.send(Ok(updated));
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_refresh(&mut self, respond_to: ServiceResponse<Profile, ProfileError>) {
        debug!("Processing refresh request");

        match self.reload().await {
            Ok(()) => {
                info!("Profile refreshed from store");
                let _ = respond_to.send(Ok(self.profile.clone()));
            }
            Err(e) => {
                error!(error = %e, "Refreshing profile failed");
                send_error!(respond_to, e);
            }
        }
    }

    /// Reloads the cache if an earlier save left it stale. Requests fail
    /// while the store cannot confirm the current state.
    async fn reconcile(&mut self) -> Result<(), ProfileError> {
        if !self.stale {
            return Ok(());
        }
        debug!("Reloading stale profile");
        self.reload().await.map_err(|e| {
            error!(error = %e, "Reloading stale profile failed");
            e
        })
    }

    async fn reload(&mut self) -> Result<(), ProfileError> {
        let loaded = store::with_timeout(
            self.config.store_timeout,
            self.store.load(self.profile.user_id()),
        )
        .await?;

        if loaded.user_id() != self.profile.user_id() {
            error!(loaded_user_id = %loaded.user_id(), "Store returned a different profile");
            return Err(
                StorageError::Corrupt(format!("expected profile {}", self.profile.user_id())).into(),
            );
        }
        self.profile = loaded;
        self.stale = false;
        Ok(())
    }
}
