//! # Mock Framework
//!
//! Utilities for testing code that consumes a [`ProfileClient`] without
//! running a `ProfileService`.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! channel, then helpers like [`expect_get_profile`] or [`expect_update`] to
//! assert what was sent and reply however the test needs (success, failure,
//! or never).

use tokio::sync::mpsc;

use crate::clients::ProfileClient;
use crate::domain::{CooldownStatus, Profile};
use crate::error::ProfileError;
use crate::messages::{ProfileRequest, ServiceResponse};

/// Creates a client whose requests arrive on the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (ProfileClient, mpsc::Receiver<ProfileRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ProfileClient::new(sender), receiver)
}

/// Helper to verify that the next message is a GetProfile request
pub async fn expect_get_profile(
    receiver: &mut mpsc::Receiver<ProfileRequest>,
) -> Option<ServiceResponse<Profile, ProfileError>> {
    match receiver.recv().await {
        Some(ProfileRequest::GetProfile { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a CooldownStatus request
pub async fn expect_cooldown_status(
    receiver: &mut mpsc::Receiver<ProfileRequest>,
) -> Option<ServiceResponse<CooldownStatus, ProfileError>> {
    match receiver.recv().await {
        Some(ProfileRequest::CooldownStatus { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an UpdateDisplayName request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<ProfileRequest>,
) -> Option<(String, ServiceResponse<Profile, ProfileError>)> {
    match receiver.recv().await {
        Some(ProfileRequest::UpdateDisplayName {
            candidate,
            respond_to,
        }) => Some((candidate, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, UserId};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let update_task = tokio::spawn(async move {
            client.update_display_name("Bob".to_string()).await
        });

        let (candidate, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(candidate, "Bob");
        let profile = Profile::new(UserId::new("user_1"), DisplayName::parse("Bob").unwrap());
        responder.send(Ok(profile.clone())).unwrap();

        let result = update_task.await.unwrap();
        assert_eq!(result, Ok(profile));
    }

    #[tokio::test]
    async fn dropped_responder_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let get_task = tokio::spawn(async move { client.current_profile().await });

        let responder = expect_get_profile(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        assert!(matches!(
            get_task.await.unwrap(),
            Err(ProfileError::ActorCommunicationError(_))
        ));
    }
}
