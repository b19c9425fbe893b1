//! Typed views over Rize responses
//!
//! The client hands back the raw response; callers pick out the part they need with
//! [`extract`] and one of these types.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::RizeError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct User {
    pub id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub emoji: Option<String>,
    pub color: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub emoji: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Relay style connection
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// User-facing error reported inside a mutation payload
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PayloadError {
    pub message: Option<String>,
}

/// The `{ <entity>, errors }` payload shared by the Rize mutations
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MutationPayload<T> {
    #[serde(
        alias = "project",
        alias = "task",
        alias = "session",
        default = "Option::default"
    )]
    pub entity: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<PayloadError>>,
}

impl<T> MutationPayload<T> {
    /// The payload errors joined into one message, if there were any
    pub fn error_message(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|errors| !errors.is_empty())?;
        Some(
            errors
                .iter()
                .map(|error| error.message.as_deref().unwrap_or("Unknown error"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Deserialize the value at `pointer` (a JSON pointer such as `/data/currentSession`).
///
/// A missing or `null` value yields `Ok(None)`.
pub fn extract<T: DeserializeOwned>(
    response: &Value,
    pointer: &str,
) -> Result<Option<T>, RizeError> {
    match response.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|e| RizeError::InvalidResponse(format!("{pointer}: {e}"))),
    }
}
