//! Boundary DTOs exchanged with the auth provider and document store.
//!
//! DESIGN
//! ======
//! These mirror the provider payloads as loosely as they arrive: every auth
//! field is optional and document bodies are untyped JSON maps. Coercion into
//! the typed `state` models happens one layer up.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Raw identity payload from the auth provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// A document from the store: stable id plus an untyped field map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { id: id.into(), fields }
    }

    /// String value of `key`, if present and a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Full point-in-time content of a collection, in store order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionSnapshot {
    pub documents: Vec<Document>,
}

impl CollectionSnapshot {
    #[must_use]
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build a snapshot from per-document reads, skipping unreadable ones.
    pub fn from_reads(reads: impl IntoIterator<Item = Result<Document, ProviderError>>) -> Self {
        let documents = reads
            .into_iter()
            .filter_map(|read| match read {
                Ok(doc) => Some(doc),
                Err(e) => {
                    log::warn!("skipping unreadable document in snapshot: {e}");
                    None
                }
            })
            .collect();
        Self { documents }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Failure reported by the auth provider or the document store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The user dismissed the sign-in flow.
    #[error("sign-in was cancelled")]
    Cancelled,

    /// Transport failure reaching the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider refused the request.
    #[error("{message}")]
    Rejected { code: String, message: String },

    /// The provider SDK is not loaded or not configured.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with a payload we could not read.
    #[error("malformed provider payload: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Map a provider error code (e.g. `auth/popup-closed-by-user`) to a variant.
    #[must_use]
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "auth/popup-closed-by-user" | "auth/cancelled-popup-request" | "auth/user-cancelled" => {
                Self::Cancelled
            }
            "auth/network-request-failed" | "unavailable" | "deadline-exceeded" => {
                Self::Network(message.to_owned())
            }
            _ => Self::Rejected { code: code.to_owned(), message: message.to_owned() },
        }
    }
}
