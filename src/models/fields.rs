//! Serde helpers for request payload fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A string with surrounding whitespace removed, so a blank value fails the
/// `length(min = 1)` check that follows.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// Marks a field as present, keeping a JSON `null` as `Some(None)`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// An optional field that, when sent, must not be `null`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(D::Error::custom("This field may not be null.")),
    }
}

/// `non_null` for strings, trimmed like `trimmed`.
pub(crate) fn non_null_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_null::<D, String>(deserializer)?.map(|value| value.trim().to_string()))
}
