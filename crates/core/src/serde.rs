//! Serde helper functions for request body deserialization.
//!
//! Filter forms post blank strings and `null` lists for fields the user left
//! untouched. These helpers normalize both to "absent".

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating blank strings as None.
///
/// Surrounding whitespace is removed from present values.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Deserialize a list of strings, treating `null` as empty and dropping blank items.
pub fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Deserialize a list of integers, treating `null` as empty.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<i64>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default())
}
