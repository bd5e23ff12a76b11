//! Ticket query response DTOs.
//!
//! The service wraps results in an envelope:
//!
//! ```json
//! { "data": { "result": ["...|G101|...", "..."] }, "messages": [] }
//! ```
//!
//! Field names have been seen both capitalized and lowercase, and
//! `messages` is sometimes an empty string instead of an array. Any of the
//! fields may also be `null`, which reads as empty.

use serde::{Deserialize, Deserializer};

/// Top-level response of the ticket query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryEnvelope {
    #[serde(
        default,
        rename = "data",
        alias = "Data",
        deserialize_with = "null_as_default"
    )]
    pub data: QueryData,

    #[serde(
        default,
        rename = "messages",
        alias = "Messages",
        deserialize_with = "null_as_default"
    )]
    pub messages: Messages,
}

/// Payload holding the raw ticket records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryData {
    /// One `|`-delimited string per train.
    #[serde(
        default,
        rename = "result",
        alias = "Result",
        deserialize_with = "null_as_default"
    )]
    pub result: Vec<String>,
}

/// Business messages from the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    List(Vec<String>),
    Text(String),
}

impl Default for Messages {
    fn default() -> Self {
        Messages::List(Vec::new())
    }
}

impl Messages {
    /// Non-blank messages.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Messages::List(list) => list.into_iter().filter(|m| !m.trim().is_empty()).collect(),
            Messages::Text(text) if text.trim().is_empty() => Vec::new(),
            Messages::Text(text) => vec![text],
        }
    }
}

/// Read `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
