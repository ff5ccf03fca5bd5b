//! Collaborator seams: the auth provider and the document store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The core never talks to a concrete backend. Browser builds plug in the
//! Firebase adapters (`net::firebase`); tests and native builds use the
//! in-memory adapters (`net::memory`).
//!
//! All work is single-threaded, so handlers are plain `Rc<dyn Fn>` and the
//! async traits are `?Send`.

use std::rc::Rc;

use async_trait::async_trait;

use super::types::{AuthUser, CollectionSnapshot, Document, ProviderError};
use crate::util::subscription::Subscription;

/// Called with `Some(user)` on sign-in and `None` when no user is present.
pub type AuthHandler = Rc<dyn Fn(Option<AuthUser>)>;

/// Called with every full snapshot of a collection, or with a listen error.
pub type SnapshotHandler = Rc<dyn Fn(Result<CollectionSnapshot, ProviderError>)>;

/// External identity provider.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// Register an auth-state handler until the returned handle is released.
    fn subscribe(&self, handler: AuthHandler) -> Subscription;

    /// Run the interactive (popup) sign-in flow.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the user cancels or the provider fails.
    async fn sign_in_interactive(&self) -> Result<AuthUser, ProviderError>;

    /// Sign the current user out.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider rejects the request.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}

/// External document store holding the catalog collection.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Listen to a collection until the returned handle is released.
    ///
    /// Every delivery carries the complete collection, not a diff. A delivered
    /// error may end the subscription; callers that want to keep listening
    /// open a new one.
    fn subscribe_collection(&self, collection: &str, handler: SnapshotHandler) -> Subscription;

    /// Point read of one document. `Ok(None)` means the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the read fails.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError>;
}
