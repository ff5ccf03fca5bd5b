//! Auth event listener: the only writer of session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the app root for its whole lifetime. It registers one handler with
//! the auth provider, normalizes every populated payload into an `Identity`,
//! and moves the user to the catalog when a new identity arrives. Sign-in and
//! sign-out actions from the UI go through it too, so session state keeps a
//! single writer.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures from the actions are logged and returned to the caller
//! (which shows a notice). They never touch session state.

#[cfg(test)]
#[path = "auth_listener_test.rs"]
mod auth_listener_test;

use std::rc::Rc;

use super::provider::AuthProvider;
use super::types::{AuthUser, ProviderError};
use crate::state::session::{Identity, SessionState};
use crate::state::store::{Store, StoreWriter};
use crate::util::routes::{Navigation, Navigator, Route};
use crate::util::subscription::Subscription;

/// Session writer plus navigation; shared by the provider handler and actions.
struct SessionSink {
    session: StoreWriter<SessionState>,
    navigator: Rc<dyn Navigator>,
}

impl SessionSink {
    /// Write a populated payload. Navigates to the catalog only when the
    /// stored identity actually changed.
    fn accept(&self, user: &AuthUser) {
        let identity = Identity::from_auth_user(user);
        if self.session.replace_if_changed(SessionState::signed_in(identity)) {
            log::info!("signed in as {}", self.session.get().display_name());
            self.navigator.navigate(Navigation::push(Route::Catalog));
        }
    }

    fn clear(&self) {
        self.session.replace_if_changed(SessionState::signed_out());
    }
}

struct Inner {
    provider: Rc<dyn AuthProvider>,
    sink: Rc<SessionSink>,
    _subscription: Subscription,
}

/// Attached listener. Cheap to clone; the provider registration is released
/// when the last clone drops.
#[derive(Clone)]
pub struct AuthEventListener {
    inner: Rc<Inner>,
}

impl AuthEventListener {
    /// Register with `provider` and take ownership of the session writer.
    pub fn attach(
        provider: Rc<dyn AuthProvider>,
        session: StoreWriter<SessionState>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let sink = Rc::new(SessionSink { session, navigator });

        let handler_sink = sink.clone();
        let subscription = provider.subscribe(Rc::new(move |user: Option<AuthUser>| {
            if let Some(user) = user {
                handler_sink.accept(&user);
            }
        }));

        Self { inner: Rc::new(Inner { provider, sink, _subscription: subscription }) }
    }

    /// Read-only handle onto the session this listener writes.
    #[must_use]
    pub fn session(&self) -> Store<SessionState> {
        self.inner.sink.session.reader()
    }

    /// Interactive sign-in. On success the identity is written as if the
    /// provider had emitted it.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; session state is left unchanged.
    pub async fn sign_in(&self) -> Result<(), ProviderError> {
        match self.inner.provider.sign_in_interactive().await {
            Ok(user) => {
                self.inner.sink.accept(&user);
                Ok(())
            }
            Err(e) => {
                log::warn!("sign-in failed: {e}");
                Err(e)
            }
        }
    }

    /// Sign out, clear the session, and return to the entry route.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; session state is left unchanged.
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Err(e) = self.inner.provider.sign_out().await {
            log::warn!("sign-out failed: {e}");
            return Err(e);
        }
        self.inner.sink.clear();
        self.inner.sink.navigator.navigate(Navigation::push(Route::Entry));
        Ok(())
    }
}
