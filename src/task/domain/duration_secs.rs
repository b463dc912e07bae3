//! Serde helpers encoding [`Duration`] as an integer count of seconds.
//!
//! Use with `#[serde(with = "duration_secs")]` or, for optional fields,
//! `#[serde(with = "duration_secs::option")]`. Sub-second precision is
//! dropped on serialization.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Serializes a duration as whole seconds.
///
/// # Errors
///
/// Returns the serializer's error when it rejects a `u64`.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(value.as_secs())
}

/// Deserializes a duration from whole seconds.
///
/// # Errors
///
/// Returns the deserializer's error when the input is not a `u64`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

/// Same encoding for `Option<Duration>`; `None` maps to `null`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serializes an optional duration as whole seconds or `null`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error when it rejects the value.
    #[expect(
        clippy::ref_option,
        reason = "serde `with` modules receive a reference to the field type"
    )]
    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional duration from whole seconds or `null`.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error when the input is neither `null` nor
    /// a `u64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
