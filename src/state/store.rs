//! Observable single-writer value stores.
//!
//! DESIGN
//! ======
//! `Store::new` hands out exactly one `StoreWriter` and any number of read-only
//! `Store` handles. Writes replace the whole value (never patch it), so a
//! reader holding an `Rc<T>` from `get()` always sees one consistent version.
//! Observers run after the internal borrow is released and may read the store
//! or subscribe again from inside their callback.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::util::subscription::Subscription;

type Observer<T> = Rc<dyn Fn(&Rc<T>)>;

struct Inner<T> {
    value: RefCell<Rc<T>>,
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_id: Cell<u64>,
}

/// Read-only handle to a shared value.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

/// The only handle allowed to replace a store's value. Not `Clone`.
pub struct StoreWriter<T> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Store<T> {
    /// Create a store, returning its single writer and a reader.
    pub fn new(initial: T) -> (StoreWriter<T>, Store<T>) {
        let inner = Rc::new(Inner {
            value: RefCell::new(Rc::new(initial)),
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        });
        (StoreWriter { inner: inner.clone() }, Store { inner })
    }

    /// Current value snapshot.
    pub fn get(&self) -> Rc<T> {
        self.inner.value.borrow().clone()
    }

    /// Register an observer called after every replacement.
    ///
    /// The observer is not called with the current value; read it with
    /// [`Store::get`] if needed.
    pub fn subscribe(&self, observer: impl Fn(&Rc<T>) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.observers.borrow_mut().push((id, Rc::new(observer)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.observers.borrow_mut().retain(|(oid, _)| *oid != id);
            }
        })
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

impl<T: 'static> StoreWriter<T> {
    /// Replace the value wholesale and notify observers.
    pub fn replace(&self, value: T) {
        let next = Rc::new(value);
        *self.inner.value.borrow_mut() = next.clone();

        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(&next);
        }
    }

    /// A read-only handle onto the same store.
    pub fn reader(&self) -> Store<T> {
        Store { inner: self.inner.clone() }
    }

    /// Current value snapshot.
    pub fn get(&self) -> Rc<T> {
        self.inner.value.borrow().clone()
    }
}

impl<T: PartialEq + 'static> StoreWriter<T> {
    /// Replace only when the value differs. Returns whether a write happened.
    pub fn replace_if_changed(&self, value: T) -> bool {
        if *self.get() == value {
            return false;
        }
        self.replace(value);
        true
    }
}
