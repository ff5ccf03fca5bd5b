use super::*;
use crate::net::memory::MemoryDocumentStore;
use crate::net::provider::SnapshotHandler;
use crate::net::types::Document;
use crate::state::catalog::ItemKind;
use async_trait::async_trait;
use serde_json::json;

const MOVIES: &str = "movies";

fn typed(id: &str, kind: &str) -> Document {
    Document::new(id, json!({ "type": kind, "title": id }).as_object().cloned().unwrap())
}

fn identity(name: &str) -> Identity {
    Identity { display_name: name.to_owned(), email: format!("{name}@x.com"), photo_url: String::new() }
}

struct Harness {
    docs: MemoryDocumentStore,
    session: StoreWriter<SessionState>,
    catalog: Store<CatalogState>,
    sync: CatalogSync,
}

fn harness(initial: SessionState) -> Harness {
    let docs = MemoryDocumentStore::new();
    let (session, session_reader) = Store::new(initial);
    let (catalog_writer, catalog) = Store::new(CatalogState::default());
    let sync = CatalogSync::attach(Rc::new(docs.clone()), MOVIES, &session_reader, catalog_writer);
    Harness { docs, session, catalog, sync }
}

/// Forwards to a memory store but ends each listener once it reports an
/// error, the way a hosted store tears down a failed listen.
struct EndsOnError {
    docs: MemoryDocumentStore,
    opened: Cell<usize>,
}

#[async_trait(?Send)]
impl DocumentStore for EndsOnError {
    fn subscribe_collection(&self, collection: &str, handler: SnapshotHandler) -> Subscription {
        self.opened.set(self.opened.get() + 1);
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let s = slot.clone();
        let sub = self.docs.subscribe_collection(
            collection,
            Rc::new(move |result: Result<CollectionSnapshot, ProviderError>| {
                if result.is_err() {
                    drop(s.borrow_mut().take());
                }
                handler(result);
            }),
        );
        *slot.borrow_mut() = Some(sub);
        Subscription::new(move || drop(slot.borrow_mut().take()))
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError> {
        self.docs.get_document(collection, id).await
    }
}

/// Every listen fails immediately.
#[derive(Default)]
struct AlwaysFails {
    opened: Cell<usize>,
}

#[async_trait(?Send)]
impl DocumentStore for AlwaysFails {
    fn subscribe_collection(&self, _collection: &str, handler: SnapshotHandler) -> Subscription {
        self.opened.set(self.opened.get() + 1);
        handler(Err(ProviderError::Rejected {
            code: "permission-denied".to_owned(),
            message: "rules".to_owned(),
        }));
        Subscription::new(|| {})
    }

    async fn get_document(&self, _collection: &str, _id: &str) -> Result<Option<Document>, ProviderError> {
        Ok(None)
    }
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn no_session_means_no_listener() {
    let h = harness(SessionState::signed_out());
    assert!(!h.sync.is_listening());
    assert_eq!(h.docs.listener_count(MOVIES), 0);
    assert!(h.catalog.get().is_empty());
}

#[test]
fn active_session_opens_exactly_one_listener() {
    let h = harness(SessionState::signed_in(identity("ann")));
    assert!(h.sync.is_listening());
    assert_eq!(h.docs.listener_count(MOVIES), 1);

    h.session.replace(SessionState::signed_in(identity("ann")));
    assert_eq!(h.docs.listener_count(MOVIES), 1);
}

#[test]
fn sign_in_after_mount_opens_listener_and_loads() {
    let h = harness(SessionState::signed_out());
    h.docs.put(MOVIES, typed("a", "trending"));
    assert!(h.catalog.get().is_empty());

    h.session.replace(SessionState::signed_in(identity("ann")));
    assert_eq!(h.docs.listener_count(MOVIES), 1);
    assert_eq!(h.catalog.get().trending.len(), 1);
}

#[test]
fn sign_out_closes_listener_and_empties_catalog() {
    let h = harness(SessionState::signed_in(identity("ann")));
    h.docs.put(MOVIES, typed("a", "new"));
    assert_eq!(h.catalog.get().len(), 1);

    h.session.replace(SessionState::signed_out());
    assert!(!h.sync.is_listening());
    assert_eq!(h.docs.listener_count(MOVIES), 0);
    assert!(h.catalog.get().is_empty());

    h.docs.put(MOVIES, typed("b", "new"));
    assert!(h.catalog.get().is_empty());
}

#[test]
fn identity_change_resubscribes() {
    let h = harness(SessionState::signed_in(identity("ann")));
    h.docs.put(MOVIES, typed("a", "original"));
    let before = h.catalog.get().generation;

    h.session.replace(SessionState::signed_in(identity("bo")));
    assert_eq!(h.docs.listener_count(MOVIES), 1);
    assert!(h.catalog.get().generation > before);
    assert_eq!(h.catalog.get().original.len(), 1);
}

#[test]
fn sign_out_then_sign_in_resubscribes() {
    let h = harness(SessionState::signed_in(identity("ann")));
    h.session.replace(SessionState::signed_out());
    h.session.replace(SessionState::signed_in(identity("ann")));
    assert!(h.sync.is_listening());
    assert_eq!(h.docs.listener_count(MOVIES), 1);
}

#[test]
fn dropping_sync_releases_everything() {
    let Harness { docs, session, catalog, sync } = harness(SessionState::signed_in(identity("ann")));
    docs.put(MOVIES, typed("a", "recommend"));
    assert_eq!(catalog.get().len(), 1);

    drop(sync);
    assert_eq!(docs.listener_count(MOVIES), 0);
    assert_eq!(session.reader().observer_count(), 0);
    assert!(catalog.get().is_empty());
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn each_snapshot_rebuilds_from_scratch() {
    let h = harness(SessionState::signed_in(identity("ann")));
    h.docs.put(MOVIES, typed("a", "new"));
    h.docs.put(MOVIES, typed("b", "new"));
    assert_eq!(h.catalog.get().new_disney.len(), 2);

    h.docs.put(MOVIES, typed("a", "trending"));
    let catalog = h.catalog.get();
    assert_eq!(catalog.new_disney.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(catalog.trending.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn unknown_types_are_dropped_without_faulting() {
    let h = harness(SessionState::signed_in(identity("ann")));
    for (id, kind) in [("r", "recommend"), ("n", "new"), ("o", "original"), ("t", "trending"), ("b", "bogus")] {
        h.docs.put(MOVIES, typed(id, kind));
    }
    let catalog = h.catalog.get();
    for kind in ItemKind::ALL {
        assert_eq!(catalog.bucket(kind).len(), 1);
    }
    assert!(ItemKind::ALL.iter().all(|k| catalog.bucket(*k).iter().all(|i| i.id != "b")));
    assert!(h.sync.is_listening());
}

#[test]
fn observers_only_see_whole_generations() {
    let h = harness(SessionState::signed_in(identity("ann")));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _sub = h.catalog.subscribe(move |c: &Rc<CatalogState>| s.borrow_mut().push((c.generation, c.len())));

    for (id, kind) in [("r", "recommend"), ("n", "new"), ("o", "original"), ("t", "trending")] {
        h.docs.put(MOVIES, typed(id, kind));
    }

    let seen = seen.borrow();
    assert_eq!(seen.iter().map(|(_, len)| *len).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn listen_error_keeps_prior_catalog_and_listener() {
    let h = harness(SessionState::signed_in(identity("ann")));
    h.docs.put(MOVIES, typed("a", "new"));

    h.docs.fail_listeners(MOVIES, ProviderError::Network("offline".to_owned()));
    let after = h.catalog.get();
    assert_eq!(after.new_disney.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(after.len(), 1);
    assert!(h.sync.is_listening());
    assert_eq!(h.docs.listener_count(MOVIES), 1);

    h.docs.put(MOVIES, typed("b", "new"));
    assert_eq!(h.catalog.get().new_disney.len(), 2);
}

#[test]
fn superseded_listener_deliveries_are_ignored() {
    let h = harness(SessionState::signed_in(identity("ann")));
    let inner = h.sync.inner.clone();
    let stale_epoch = inner.epoch.get();

    h.session.replace(SessionState::signed_in(identity("bo")));
    let before = h.catalog.get();
    inner.on_snapshot(stale_epoch, Ok(CollectionSnapshot::new(vec![typed("x", "new")])));
    assert_eq!(*h.catalog.get(), *before);
}

// =============================================================
// Listen errors
// =============================================================

#[test]
fn listener_ended_by_error_is_reopened() {
    let docs = MemoryDocumentStore::new();
    let store = Rc::new(EndsOnError { docs: docs.clone(), opened: Cell::new(0) });
    let (_session, session_reader) = Store::new(SessionState::signed_in(identity("ann")));
    let (catalog_writer, catalog) = Store::new(CatalogState::default());
    let sync = CatalogSync::attach(store.clone(), MOVIES, &session_reader, catalog_writer);
    docs.put(MOVIES, typed("a", "new"));

    docs.fail_listeners(MOVIES, ProviderError::Network("offline".to_owned()));
    assert_eq!(store.opened.get(), 2);
    assert_eq!(docs.listener_count(MOVIES), 1);
    assert!(sync.is_listening());

    docs.put(MOVIES, typed("b", "trending"));
    let catalog = catalog.get();
    assert_eq!(catalog.new_disney.len(), 1);
    assert_eq!(catalog.trending.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn repeated_listen_errors_give_up_and_keep_catalog() {
    let store = Rc::new(AlwaysFails::default());
    let (session, session_reader) = Store::new(SessionState::signed_in(identity("ann")));
    let (catalog_writer, catalog) = Store::new(CatalogState::default());
    let sync = CatalogSync::attach(store.clone(), MOVIES, &session_reader, catalog_writer);

    assert_eq!(store.opened.get(), 1 + MAX_RELISTEN as usize);
    assert!(!sync.is_listening());
    assert!(catalog.get().is_empty());

    session.replace(SessionState::signed_in(identity("bo")));
    assert_eq!(store.opened.get(), 2 * (1 + MAX_RELISTEN as usize));
}
