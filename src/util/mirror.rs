//! Bridge from a core [`Store`] to a Leptos signal.

#[cfg(test)]
#[path = "mirror_test.rs"]
mod mirror_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::state::store::Store;

/// A signal that follows `store` for the lifetime of the current owner.
///
/// The store observer is held by the owner and released with it; a write
/// that lands after the signal is disposed is dropped.
pub fn mirror_store<T>(store: &Store<T>) -> RwSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    let signal = RwSignal::new((*store.get()).clone());
    let observer = store.subscribe(move |value: &Rc<T>| {
        let _ = signal.try_set((**value).clone());
    });
    StoredValue::new_local(observer);
    signal
}
