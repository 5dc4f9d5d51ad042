//! Display-name validation rules.
//!
//! Checks run in a fixed order and stop at the first failure:
//! empty, too short, too long, invalid characters, banned word.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Shortest accepted name, counted in characters after trimming.
pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;

/// Longest accepted name, counted in characters after trimming.
///
/// Input fields should read this constant so their length limit never drifts
/// from validation.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 32;

/// Punctuation accepted in addition to letters, digits and spaces.
pub const ALLOWED_PUNCTUATION: &[char] = &['-', '_', '.', '\''];

/// Names (or words inside names) reserved for staff and system accounts.
/// Entries are lowercase.
pub const BANNED_WORDS: &[&str] = &[
    "admin",
    "administrator",
    "moderator",
    "mod",
    "support",
    "staff",
    "system",
    "root",
    "official",
    "null",
    "undefined",
];

/// A trimmed display name that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(candidate: &str) -> Result<Self, ValidationError> {
        let name = candidate.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty);
        }

        let length = name.chars().count();
        if length < MIN_DISPLAY_NAME_LENGTH {
            return Err(ValidationError::TooShort {
                min: MIN_DISPLAY_NAME_LENGTH,
            });
        }
        if length > MAX_DISPLAY_NAME_LENGTH {
            return Err(ValidationError::TooLong {
                max: MAX_DISPLAY_NAME_LENGTH,
            });
        }

        if let Some(invalid) = name.chars().find(|c| !is_allowed_char(*c)) {
            return Err(ValidationError::InvalidChars(invalid));
        }

        if contains_banned_word(name) {
            return Err(ValidationError::BannedWord);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of checking a candidate name. Produced fresh by every [`validate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    error: Option<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }
}

impl From<Result<DisplayName, ValidationError>> for ValidationResult {
    fn from(result: Result<DisplayName, ValidationError>) -> Self {
        Self { error: result.err() }
    }
}

/// Checks a candidate display name. Pure; safe to call from any thread.
pub fn validate(candidate: &str) -> ValidationResult {
    DisplayName::parse(candidate).into()
}

fn is_allowed_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == ' ' || ALLOWED_PUNCTUATION.contains(&c)
}

fn contains_banned_word(name: &str) -> bool {
    let lowered = name.to_lowercase();
    if BANNED_WORDS.contains(&lowered.as_str()) {
        return true;
    }
    lowered
        .split(|c: char| c == ' ' || ALLOWED_PUNCTUATION.contains(&c))
        .filter(|word| !word.is_empty())
        .any(|word| BANNED_WORDS.contains(&word))
}
