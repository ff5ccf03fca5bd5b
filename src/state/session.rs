//! Session state: who is signed in, if anyone.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written only by `net::auth_listener`. Read by route guards, catalog sync,
//! and the header.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::AuthUser;

/// Normalized identity of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
}

impl Identity {
    /// Normalize a provider payload; missing fields become empty strings.
    #[must_use]
    pub fn from_auth_user(user: &AuthUser) -> Self {
        Self {
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            photo_url: user.photo_url.clone().unwrap_or_default(),
        }
    }
}

/// Current session. `identity: None` is the signed-out state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
}

impl SessionState {
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self { identity: Some(identity) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { identity: None }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Display name, or empty when signed out.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.identity.as_ref().map_or("", |i| i.display_name.as_str())
    }

    /// Avatar URL, or empty when signed out.
    #[must_use]
    pub fn photo_url(&self) -> &str {
        self.identity.as_ref().map_or("", |i| i.photo_url.as_str())
    }
}
