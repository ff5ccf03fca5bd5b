//! Route guard for protected pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route mounts one [`RouteGuard`]. It decides synchronously
//! from the cached session (so a known-signed-out user is redirected without
//! waiting on the provider), then keeps listening to both the session store
//! and the auth provider for as long as it is mounted.
//!
//! DESIGN
//! ======
//! Deny wins. A "no identity" signal from either source moves the guard to
//! `Denied` and redirects to the entry route with history replacement. Nothing
//! moves a guard out of `Denied`; the redirect fires once.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::RefCell;
use std::rc::Rc;

use super::routes::{Navigation, Navigator, Route};
use super::subscription::Subscription;
use crate::net::provider::AuthProvider;
use crate::net::types::AuthUser;
use crate::state::session::SessionState;
use crate::state::store::{Store, StoreWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Denied,
    Admitted,
}

/// An identity observation from one of the two sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardSignal {
    /// Session store: whether it holds an identity.
    Cache(bool),
    /// Auth provider callback: whether it reported a user.
    Provider(bool),
}

impl GuardSignal {
    fn identity_present(self) -> bool {
        match self {
            Self::Cache(present) | Self::Provider(present) => present,
        }
    }
}

/// Pure transition logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardMachine {
    state: GuardState,
}

impl Default for GuardMachine {
    fn default() -> Self {
        Self { state: GuardState::Checking }
    }
}

impl GuardMachine {
    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Apply a signal. Returns `true` exactly when this call moved the guard
    /// into `Denied`, i.e. when the caller must redirect.
    pub fn observe(&mut self, signal: GuardSignal) -> bool {
        if self.state == GuardState::Denied {
            return false;
        }
        if signal.identity_present() {
            self.state = GuardState::Admitted;
            false
        } else {
            self.state = GuardState::Denied;
            true
        }
    }
}

struct Shared {
    machine: RefCell<GuardMachine>,
    state: StoreWriter<GuardState>,
    navigator: Rc<dyn Navigator>,
}

impl Shared {
    fn observe(&self, signal: GuardSignal) {
        let (redirect, state) = {
            let mut machine = self.machine.borrow_mut();
            let redirect = machine.observe(signal);
            (redirect, machine.state())
        };
        self.state.replace_if_changed(state);
        if redirect {
            log::info!("route guard denied access ({signal:?}); redirecting to entry");
            self.navigator.navigate(Navigation::replace(Route::Entry));
        }
    }
}

/// A mounted guard. Dropping it releases both listeners.
pub struct RouteGuard {
    shared: Rc<Shared>,
    _provider: Subscription,
    _session: Subscription,
}

impl RouteGuard {
    /// Mount a guard: decide from the cached session now, then listen.
    pub fn mount(provider: &dyn AuthProvider, session: &Store<SessionState>, navigator: Rc<dyn Navigator>) -> Self {
        let (state, _) = Store::new(GuardState::Checking);
        let shared = Rc::new(Shared { machine: RefCell::new(GuardMachine::default()), state, navigator });

        shared.observe(GuardSignal::Cache(session.get().is_signed_in()));

        let from_provider = shared.clone();
        let provider_sub = provider.subscribe(Rc::new(move |user: Option<AuthUser>| {
            from_provider.observe(GuardSignal::Provider(user.is_some()));
        }));

        let from_session = shared.clone();
        let session_sub = session.subscribe(move |s: &Rc<SessionState>| {
            from_session.observe(GuardSignal::Cache(s.is_signed_in()));
        });

        Self { shared, _provider: provider_sub, _session: session_sub }
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.shared.machine.borrow().state()
    }

    /// Observable guard state, for views that render on admission.
    #[must_use]
    pub fn state_store(&self) -> Store<GuardState> {
        self.shared.state.reader()
    }
}
