//! Live catalog sync: the only writer of catalog state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted by the catalog page. It follows the session store: a new identity
//! (re)opens one collection listener, no identity closes it and empties the
//! catalog. Every delivery is a full snapshot, partitioned from scratch and
//! published as one `CatalogState` replacement.
//!
//! ERROR HANDLING
//! ==============
//! Listen errors are logged and leave the current catalog in place. A store
//! may end a listener after reporting an error, so the sync reopens it, up to
//! `MAX_RELISTEN` times in a row; a successful snapshot resets the count.
//! Past that the listener stays closed until the identity changes.
//! Deliveries from a listener that has since been replaced are dropped by
//! comparing epochs.

#[cfg(test)]
#[path = "catalog_sync_test.rs"]
mod catalog_sync_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::provider::DocumentStore;
use super::types::{CollectionSnapshot, ProviderError};
use crate::state::catalog::{CatalogState, partition_snapshot};
use crate::state::session::{Identity, SessionState};
use crate::state::store::{Store, StoreWriter};
use crate::util::subscription::Subscription;

/// Consecutive listen errors tolerated before the sync stops reopening.
pub const MAX_RELISTEN: u32 = 3;

struct SyncInner {
    store: Rc<dyn DocumentStore>,
    collection: String,
    catalog: StoreWriter<CatalogState>,
    /// Bumped whenever the listener is replaced or closed.
    epoch: Cell<u64>,
    /// Snapshot counter stamped onto each published catalog.
    generation: Cell<u64>,
    /// Listen errors since the last good snapshot.
    failures: Cell<u32>,
    active_for: RefCell<Option<Identity>>,
    listen: RefCell<Option<Subscription>>,
}

impl SyncInner {
    fn on_session(self: &Rc<Self>, session: &SessionState) {
        let next = session.identity.clone();
        if *self.active_for.borrow() == next {
            return;
        }
        self.active_for.replace(next.clone());
        self.failures.set(0);

        match next {
            Some(identity) => self.start(&identity),
            None => self.stop(),
        }
    }

    fn start(self: &Rc<Self>, identity: &Identity) {
        self.close_listener();
        let epoch = self.epoch.get();
        log::info!("opening catalog listener on {:?} for {}", self.collection, identity.email);

        let weak: Weak<Self> = Rc::downgrade(self);
        let sub = self.store.subscribe_collection(
            &self.collection,
            Rc::new(move |result: Result<CollectionSnapshot, ProviderError>| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_snapshot(epoch, result);
                }
            }),
        );

        if self.epoch.get() == epoch {
            *self.listen.borrow_mut() = Some(sub);
        }
    }

    fn stop(&self) {
        if self.close_listener() {
            log::info!("closed catalog listener on {:?}", self.collection);
        }
        self.catalog.replace_if_changed(CatalogState::default());
    }

    /// Release the current listener, if any. Returns whether one was open.
    fn close_listener(&self) -> bool {
        self.epoch.set(self.epoch.get() + 1);
        let old = self.listen.borrow_mut().take();
        old.is_some()
    }

    fn on_snapshot(self: &Rc<Self>, epoch: u64, result: Result<CollectionSnapshot, ProviderError>) {
        if epoch != self.epoch.get() {
            log::debug!("dropping catalog delivery from superseded listener");
            return;
        }
        match result {
            Ok(snapshot) => {
                self.failures.set(0);
                let generation = self.generation.get() + 1;
                self.generation.set(generation);
                let partition = partition_snapshot(&snapshot, generation);
                log::debug!(
                    "catalog snapshot {generation}: {} documents, {} kept, {} skipped",
                    snapshot.len(),
                    partition.catalog.len(),
                    partition.rejected.len()
                );
                self.catalog.replace(partition.catalog);
            }
            Err(e) => self.on_listen_error(&e),
        }
    }

    fn on_listen_error(self: &Rc<Self>, e: &ProviderError) {
        let failures = self.failures.get() + 1;
        self.failures.set(failures);
        if failures > MAX_RELISTEN {
            log::error!(
                "catalog listener on {:?} failed {failures} times in a row, giving up: {e}",
                self.collection
            );
            self.close_listener();
            return;
        }

        log::warn!("catalog listener on {:?} reported an error, reopening: {e}", self.collection);
        let identity = self.active_for.borrow().clone();
        if let Some(identity) = identity {
            self.start(&identity);
        }
    }
}

/// Mounted catalog sync. Dropping it closes the listener and empties the
/// catalog.
pub struct CatalogSync {
    inner: Rc<SyncInner>,
    _session: Subscription,
}

impl CatalogSync {
    /// Start following `session`, writing partitions into `catalog`.
    pub fn attach(
        store: Rc<dyn DocumentStore>,
        collection: impl Into<String>,
        session: &Store<SessionState>,
        catalog: StoreWriter<CatalogState>,
    ) -> Self {
        let inner = Rc::new(SyncInner {
            store,
            collection: collection.into(),
            catalog,
            epoch: Cell::new(0),
            generation: Cell::new(0),
            failures: Cell::new(0),
            active_for: RefCell::new(None),
            listen: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let session_sub = session.subscribe(move |s: &Rc<SessionState>| {
            if let Some(inner) = weak.upgrade() {
                inner.on_session(s);
            }
        });

        inner.on_session(&session.get());

        Self { inner, _session: session_sub }
    }

    /// Read-only handle onto the catalog this sync writes.
    #[must_use]
    pub fn catalog(&self) -> Store<CatalogState> {
        self.inner.catalog.reader()
    }

    /// Whether a collection listener is currently open.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.inner.listen.borrow().is_some()
    }
}

impl Drop for CatalogSync {
    fn drop(&mut self) {
        self.inner.stop();
    }
}
