//! State behind the "edit profile" screen.
//!
//! [`ProfileEditor`] keeps the draft name, its live validation result and the
//! transient banner. Rendering and clipboard access belong to whatever
//! presentation layer drives it.

mod banner;

pub use banner::Banner;

use tracing::{debug, instrument, warn};

use crate::clients::ProfileClient;
use crate::config::EditorConfig;
use crate::domain::{self, CooldownStatus, Profile, ValidationResult, MAX_DISPLAY_NAME_LENGTH};
use crate::error::{ProfileError, StorageError};
use banner::BannerSlot;

pub struct ProfileEditor {
    client: ProfileClient,
    config: EditorConfig,
    profile: Option<Profile>,
    draft: String,
    validation: ValidationResult,
    banner: BannerSlot,
}

impl ProfileEditor {
    pub fn new(client: ProfileClient, config: EditorConfig) -> Self {
        Self {
            client,
            config,
            profile: None,
            draft: String::new(),
            validation: domain::validate(""),
            banner: BannerSlot::default(),
        }
    }

    /// Fetches the profile and resets the draft to the stored name.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&Profile, ProfileError> {
        let profile = self.client.current_profile().await?;
        debug!(user_id = %profile.user_id(), "Profile loaded into editor");
        self.reset_draft(&profile);
        Ok(self.profile.insert(profile))
    }

    /// `None` until [`ProfileEditor::load`] succeeded.
    pub fn current_profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Length limit for the input field.
    pub fn max_length(&self) -> usize {
        MAX_DISPLAY_NAME_LENGTH
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) -> &ValidationResult {
        self.draft = text.to_string();
        self.validation = domain::validate(text);
        &self.validation
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// True when the draft is valid and differs from the stored name.
    pub fn can_submit(&self) -> bool {
        match &self.profile {
            Some(profile) => {
                self.validation.is_valid() && self.draft.trim() != profile.display_name().as_str()
            }
            None => false,
        }
    }

    pub async fn cooldown_status(&self) -> Result<CooldownStatus, ProfileError> {
        self.client.cooldown_status().await
    }

    /// Sends the draft for saving and shows the outcome as a banner.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Profile, ProfileError> {
        match self.client.update_display_name(self.draft.clone()).await {
            Ok(profile) => {
                self.reset_draft(&profile);
                self.profile = Some(profile.clone());
                self.banner.show(Banner::Saved, self.config.banner_ttl);
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Saving display name failed");
                self.banner
                    .show(Banner::Error(user_message(&e)), self.config.banner_ttl);
                Err(e)
            }
        }
    }

    /// Returns the user id for the caller to place on the clipboard.
    pub fn copy_user_id(&self) -> Option<String> {
        let id = self.profile.as_ref()?.user_id().to_string();
        self.banner.show(Banner::Copied, self.config.banner_ttl);
        Some(id)
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner.current()
    }

    pub fn dismiss_banner(&self) {
        self.banner.dismiss();
    }

    fn reset_draft(&mut self, profile: &Profile) {
        self.draft = profile.display_name().to_string();
        self.validation = domain::validate(&self.draft);
    }
}

/// Text to show for a failed operation. Rule violations and the cooldown get
/// specific wording; anything transient gets a generic retry prompt.
pub fn user_message(error: &ProfileError) -> String {
    match error {
        ProfileError::Validation(e) => e.to_string(),
        ProfileError::CooldownActive { remaining_hours: 1 } => {
            "You can change your display name again in 1 hour".to_string()
        }
        ProfileError::CooldownActive { remaining_hours } => {
            format!("You can change your display name again in {remaining_hours} hours")
        }
        ProfileError::Storage(StorageError::NotFound(_)) => "Profile not found".to_string(),
        ProfileError::Storage(_) | ProfileError::ActorCommunicationError(_) => {
            "Could not save your changes. Please try again.".to_string()
        }
    }
}
