//! In-memory auth provider and document store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Deterministic stand-ins for the remote collaborators. Native builds mount
//! the app against these, and every test in the crate drives the core
//! through them. Events are delivered synchronously on the caller's stack.
//!
//! The auth provider does not replay the current user on `subscribe`; the
//! real SDK confirms asynchronously, so tests call [`MemoryAuthProvider::confirm`]
//! to model that later callback.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::provider::{AuthHandler, AuthProvider, DocumentStore, SnapshotHandler};
use super::types::{AuthUser, CollectionSnapshot, Document, ProviderError};
use crate::util::subscription::Subscription;

// =============================================================================
// AUTH PROVIDER
// =============================================================================

#[derive(Default)]
struct AuthInner {
    handlers: RefCell<Vec<(u64, AuthHandler)>>,
    next_id: Cell<u64>,
    current: RefCell<Option<AuthUser>>,
    interactive_user: RefCell<Option<AuthUser>>,
    sign_in_failure: RefCell<Option<ProviderError>>,
    sign_out_failure: RefCell<Option<ProviderError>>,
}

/// Auth provider whose state is driven by the caller.
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    inner: Rc<AuthInner>,
}

impl MemoryAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user returned by the next successful `sign_in_interactive`.
    pub fn set_interactive_user(&self, user: AuthUser) {
        *self.inner.interactive_user.borrow_mut() = Some(user);
    }

    /// Make the next `sign_in_interactive` fail.
    pub fn fail_next_sign_in(&self, err: ProviderError) {
        *self.inner.sign_in_failure.borrow_mut() = Some(err);
    }

    /// Make the next `sign_out` fail.
    pub fn fail_next_sign_out(&self, err: ProviderError) {
        *self.inner.sign_out_failure.borrow_mut() = Some(err);
    }

    /// Set the provider's user and deliver it to every handler.
    pub fn emit(&self, user: Option<AuthUser>) {
        self.inner.current.borrow_mut().clone_from(&user);
        self.deliver(user);
    }

    /// Deliver the provider's current user again, as the SDK does once after
    /// a listener attaches.
    pub fn confirm(&self) {
        let user = self.inner.current.borrow().clone();
        self.deliver(user);
    }

    /// The provider's current user.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.current.borrow().clone()
    }

    /// Number of registered auth handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    fn deliver(&self, user: Option<AuthUser>) {
        let handlers: Vec<AuthHandler> =
            self.inner.handlers.borrow().iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(user.clone());
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for MemoryAuthProvider {
    fn subscribe(&self, handler: AuthHandler) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.handlers.borrow_mut().push((id, handler));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handlers.borrow_mut().retain(|(hid, _)| *hid != id);
            }
        })
    }

    async fn sign_in_interactive(&self) -> Result<AuthUser, ProviderError> {
        if let Some(err) = self.inner.sign_in_failure.borrow_mut().take() {
            return Err(err);
        }
        let user = self
            .inner
            .interactive_user
            .borrow()
            .clone()
            .ok_or_else(|| ProviderError::Unavailable("no interactive user configured".to_owned()))?;
        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(err) = self.inner.sign_out_failure.borrow_mut().take() {
            return Err(err);
        }
        self.emit(None);
        Ok(())
    }
}

// =============================================================================
// DOCUMENT STORE
// =============================================================================

struct Listener {
    id: u64,
    collection: String,
    handler: SnapshotHandler,
}

#[derive(Default)]
struct StoreInner {
    collections: RefCell<HashMap<String, Vec<Document>>>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
    read_failure: RefCell<Option<ProviderError>>,
}

/// Document store holding collections in insertion order.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Rc<StoreInner>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document under a fresh id and notify listeners. Returns the id.
    pub fn insert(&self, collection: &str, fields: serde_json::Map<String, serde_json::Value>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.put(collection, Document::new(id.clone(), fields));
        id
    }

    /// Insert or replace a document (matched by id) and notify listeners.
    pub fn put(&self, collection: &str, doc: Document) {
        {
            let mut collections = self.inner.collections.borrow_mut();
            let docs = collections.entry(collection.to_owned()).or_default();
            if let Some(existing) = docs.iter_mut().find(|d| d.id == doc.id) {
                *existing = doc;
            } else {
                docs.push(doc);
            }
        }
        self.publish(collection);
    }

    /// Remove a document and notify listeners. Returns whether it existed.
    pub fn remove(&self, collection: &str, id: &str) -> bool {
        let removed = {
            let mut collections = self.inner.collections.borrow_mut();
            collections.get_mut(collection).is_some_and(|docs| {
                let before = docs.len();
                docs.retain(|d| d.id != id);
                docs.len() != before
            })
        };
        if removed {
            self.publish(collection);
        }
        removed
    }

    /// Deliver a listen error to every listener on `collection`.
    pub fn fail_listeners(&self, collection: &str, err: ProviderError) {
        for handler in self.handlers_for(collection) {
            handler(Err(err.clone()));
        }
    }

    /// Make the next `get_document` fail.
    pub fn fail_next_read(&self, err: ProviderError) {
        *self.inner.read_failure.borrow_mut() = Some(err);
    }

    /// Number of open listeners on `collection`.
    #[must_use]
    pub fn listener_count(&self, collection: &str) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.collection == collection)
            .count()
    }

    fn snapshot(&self, collection: &str) -> CollectionSnapshot {
        let docs = self
            .inner
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default();
        CollectionSnapshot::new(docs)
    }

    fn handlers_for(&self, collection: &str) -> Vec<SnapshotHandler> {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.collection == collection)
            .map(|l| l.handler.clone())
            .collect()
    }

    fn publish(&self, collection: &str) {
        let handlers = self.handlers_for(collection);
        if handlers.is_empty() {
            return;
        }
        let snapshot = self.snapshot(collection);
        for handler in handlers {
            handler(Ok(snapshot.clone()));
        }
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryDocumentStore {
    fn subscribe_collection(&self, collection: &str, handler: SnapshotHandler) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            collection: collection.to_owned(),
            handler: handler.clone(),
        });

        handler(Ok(self.snapshot(collection)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|l| l.id != id);
            }
        })
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError> {
        if let Some(err) = self.inner.read_failure.borrow_mut().take() {
            return Err(err);
        }
        Ok(self
            .inner
            .collections
            .borrow()
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }
}
