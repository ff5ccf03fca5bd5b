//! Disposable handle for callback registrations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every listener in the crate (store observers, auth listeners, collection
//! listeners) hands back a `Subscription`. Owners keep it alive for as long as
//! they want events and release it on teardown, either explicitly with
//! [`Subscription::unsubscribe`] or by dropping it.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

/// Cancellation handle returned by every `subscribe` call.
///
/// The cancel action runs exactly once.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a cancel action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Whether the cancel action has not run yet.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Release the registration now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}
