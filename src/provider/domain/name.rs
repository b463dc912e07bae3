//! Validated provider name type.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Maximum length for a provider name.
const MAX_NAME_LENGTH: usize = 64;

/// Errors returned while constructing a [`ProviderName`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderNameError {
    /// The name is empty after trimming.
    #[error("provider name must not be empty")]
    Empty,

    /// The name contains characters outside `[a-z0-9_-]`.
    #[error(
        "provider name '{0}' contains invalid characters (only lowercase alphanumeric, underscores and hyphens allowed)"
    )]
    InvalidCharacters(String),

    /// The name exceeds the length limit.
    #[error("provider name exceeds 64 character limit: {0}")]
    TooLong(String),
}

/// Lowercase identifier under which an adapter is registered
/// (e.g. `work`, `youtrack-eu`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderName(String);

impl ProviderName {
    /// Creates a validated provider name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderNameError::Empty`] when the value is empty after
    /// trimming, [`ProviderNameError::InvalidCharacters`] for characters
    /// outside `[a-z0-9_-]`, or [`ProviderNameError::TooLong`] beyond 64
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ProviderNameError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(ProviderNameError::Empty);
        }

        if normalized.len() > MAX_NAME_LENGTH {
            return Err(ProviderNameError::TooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

        if !is_valid {
            return Err(ProviderNameError::InvalidCharacters(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the provider name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProviderName {
    type Error = ProviderNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProviderName> for String {
    fn from(name: ProviderName) -> Self {
        name.0
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ProviderName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
