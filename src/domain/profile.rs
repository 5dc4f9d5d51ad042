use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::display_name::DisplayName;

/// Opaque user identifier, assigned once at account creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A user's editable profile.
///
/// Fields are private so a stored profile can only carry a name that went
/// through [`DisplayName::parse`], and the rename timestamp only moves in
/// [`Profile::renamed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    user_id: UserId,
    display_name: DisplayName,
    last_name_change_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Creates a brand-new profile with no rename history.
    pub fn new(user_id: UserId, display_name: DisplayName) -> Self {
        Self {
            user_id,
            display_name,
            last_name_change_at: None,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn last_name_change_at(&self) -> Option<DateTime<Utc>> {
        self.last_name_change_at
    }

    /// Returns a copy carrying `name`, with the rename recorded at `at`.
    pub fn renamed(&self, name: DisplayName, at: DateTime<Utc>) -> Self {
        Self {
            user_id: self.user_id.clone(),
            display_name: name,
            last_name_change_at: Some(at),
        }
    }
}
