use tokio::sync::oneshot;

use crate::domain::{CooldownStatus, Profile};
use crate::error::ProfileError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by a `ProfileService`. Each carries a oneshot channel
/// for the reply.
#[derive(Debug)]
pub enum ProfileRequest {
    GetProfile {
        respond_to: ServiceResponse<Profile, ProfileError>,
    },
    CooldownStatus {
        respond_to: ServiceResponse<CooldownStatus, ProfileError>,
    },
    UpdateDisplayName {
        candidate: String,
        respond_to: ServiceResponse<Profile, ProfileError>,
    },
    Refresh {
        respond_to: ServiceResponse<Profile, ProfileError>,
    },
    Shutdown,
}
