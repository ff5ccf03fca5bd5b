//! Client configuration parsed from build-time keys.
//!
//! The browser bundle has no process environment, so `from_build_env` reads
//! each key with `option_env!` when the crate is compiled. Everything else
//! goes through [`ClientConfig::from_lookup`], which takes any key lookup.

use serde::Serialize;

pub const DEFAULT_COLLECTION: &str = "movies";
pub const DEFAULT_NOTICE_MS: u64 = 4000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required config key {key}")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Options object handed to `firebase.initializeApp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `None` runs the app against the in-memory collaborators.
    pub firebase: Option<FirebaseConfig>,
    pub collection: String,
    /// How long an auth failure notice stays visible.
    pub notice_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { firebase: None, collection: DEFAULT_COLLECTION.to_owned(), notice_ms: DEFAULT_NOTICE_MS }
    }
}

impl ClientConfig {
    /// Build config from a key lookup. Blank values count as absent.
    ///
    /// Firebase:
    /// - `CATALOG_FIREBASE_API_KEY`, `CATALOG_FIREBASE_PROJECT_ID`: both or neither
    /// - `CATALOG_FIREBASE_AUTH_DOMAIN`, `CATALOG_FIREBASE_STORAGE_BUCKET`,
    ///   `CATALOG_FIREBASE_MESSAGING_SENDER_ID`, `CATALOG_FIREBASE_APP_ID`,
    ///   `CATALOG_FIREBASE_MEASUREMENT_ID`: optional
    ///
    /// Optional:
    /// - `CATALOG_COLLECTION`: default `movies`
    /// - `CATALOG_NOTICE_MS`: default 4000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for partial Firebase config or an unparsable
    /// notice duration.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let firebase = match (get("CATALOG_FIREBASE_API_KEY"), get("CATALOG_FIREBASE_PROJECT_ID")) {
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing { key: "CATALOG_FIREBASE_PROJECT_ID" }),
            (None, Some(_)) => return Err(ConfigError::Missing { key: "CATALOG_FIREBASE_API_KEY" }),
            (Some(api_key), Some(project_id)) => Some(FirebaseConfig {
                api_key,
                project_id,
                auth_domain: get("CATALOG_FIREBASE_AUTH_DOMAIN"),
                storage_bucket: get("CATALOG_FIREBASE_STORAGE_BUCKET"),
                messaging_sender_id: get("CATALOG_FIREBASE_MESSAGING_SENDER_ID"),
                app_id: get("CATALOG_FIREBASE_APP_ID"),
                measurement_id: get("CATALOG_FIREBASE_MEASUREMENT_ID"),
            }),
        };

        let collection = get("CATALOG_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_owned());
        let notice_ms = match get("CATALOG_NOTICE_MS") {
            None => DEFAULT_NOTICE_MS,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { key: "CATALOG_NOTICE_MS", value: raw.clone() })?,
        };

        Ok(Self { firebase, collection, notice_ms })
    }

    /// Config baked in at compile time.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| build_env(key).map(str::to_owned))
    }
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "CATALOG_FIREBASE_API_KEY" => option_env!("CATALOG_FIREBASE_API_KEY"),
        "CATALOG_FIREBASE_AUTH_DOMAIN" => option_env!("CATALOG_FIREBASE_AUTH_DOMAIN"),
        "CATALOG_FIREBASE_PROJECT_ID" => option_env!("CATALOG_FIREBASE_PROJECT_ID"),
        "CATALOG_FIREBASE_STORAGE_BUCKET" => option_env!("CATALOG_FIREBASE_STORAGE_BUCKET"),
        "CATALOG_FIREBASE_MESSAGING_SENDER_ID" => option_env!("CATALOG_FIREBASE_MESSAGING_SENDER_ID"),
        "CATALOG_FIREBASE_APP_ID" => option_env!("CATALOG_FIREBASE_APP_ID"),
        "CATALOG_FIREBASE_MEASUREMENT_ID" => option_env!("CATALOG_FIREBASE_MEASUREMENT_ID"),
        "CATALOG_COLLECTION" => option_env!("CATALOG_COLLECTION"),
        "CATALOG_NOTICE_MS" => option_env!("CATALOG_NOTICE_MS"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
