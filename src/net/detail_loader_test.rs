use super::*;
use crate::net::memory::MemoryDocumentStore;
use crate::net::provider::SnapshotHandler;
use crate::net::types::{Document, ProviderError};
use crate::state::catalog::ItemKind;
use crate::state::detail::DetailView;
use crate::util::subscription::Subscription;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::block_on;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

const MOVIES: &str = "movies";

fn movie(id: &str) -> Document {
    Document::new(
        id,
        json!({ "type": "original", "title": format!("Title {id}"), "description": "d" })
            .as_object()
            .cloned()
            .unwrap(),
    )
}

/// Store whose reads complete only when the test releases them.
#[derive(Default)]
struct GatedStore {
    pending: RefCell<HashMap<String, oneshot::Receiver<Option<Document>>>>,
}

impl GatedStore {
    fn gate(&self, id: &str) -> oneshot::Sender<Option<Document>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(id.to_owned(), rx);
        tx
    }
}

#[async_trait(?Send)]
impl DocumentStore for GatedStore {
    fn subscribe_collection(&self, _collection: &str, _handler: SnapshotHandler) -> Subscription {
        Subscription::new(|| {})
    }

    async fn get_document(&self, _collection: &str, id: &str) -> Result<Option<Document>, ProviderError> {
        let rx = self.pending.borrow_mut().remove(id);
        match rx {
            Some(rx) => rx.await.map_err(|_| ProviderError::Cancelled),
            None => Ok(None),
        }
    }
}

// =============================================================
// Single reads
// =============================================================

#[test]
fn found_document_is_loaded() {
    let docs = MemoryDocumentStore::new();
    docs.put(MOVIES, movie("m1"));
    let loader = DetailLoader::new(Rc::new(docs), MOVIES);

    assert!(block_on(loader.load("m1")));
    let state = loader.state().get();
    assert!(!state.loading);
    let item = state.item().unwrap();
    assert_eq!(item.id, "m1");
    assert_eq!(item.kind, Some(ItemKind::Original));
    assert_eq!(item.info.title, "Title m1");
}

#[test]
fn missing_document_is_not_found() {
    let loader = DetailLoader::new(Rc::new(MemoryDocumentStore::new()), MOVIES);
    assert!(block_on(loader.load("nope")));
    assert_eq!(loader.state().get().view, DetailView::NotFound);
}

#[test]
fn read_failure_keeps_prior_view() {
    let docs = MemoryDocumentStore::new();
    docs.put(MOVIES, movie("m1"));
    let loader = DetailLoader::new(Rc::new(docs.clone()), MOVIES);
    block_on(loader.load("m1"));

    docs.fail_next_read(ProviderError::Network("offline".to_owned()));
    assert!(block_on(loader.load("m1")));

    let state = loader.state().get();
    assert!(!state.loading);
    assert_eq!(state.item().map(|i| i.id.as_str()), Some("m1"));
}

// =============================================================
// Overlapping reads
// =============================================================

#[test]
fn stale_response_is_discarded() {
    let store = Rc::new(GatedStore::default());
    let tx_a = store.gate("a");
    let tx_b = store.gate("b");
    let loader = DetailLoader::new(store, MOVIES);

    let (applied_a, applied_b, ()) = block_on(async {
        futures::join!(loader.load("a"), loader.load("b"), async {
            tx_b.send(Some(movie("b"))).unwrap();
            tx_a.send(Some(movie("a"))).unwrap();
        })
    });

    assert!(!applied_a);
    assert!(applied_b);
    let state = loader.state().get();
    assert_eq!(state.requested.as_deref(), Some("b"));
    assert_eq!(state.item().map(|i| i.id.as_str()), Some("b"));
}

#[test]
fn loading_flag_is_set_while_read_is_pending() {
    let store = Rc::new(GatedStore::default());
    let tx = store.gate("a");
    let loader = DetailLoader::new(store, MOVIES);
    let state = loader.state();

    let seen_loading = block_on(async {
        let (_, seen) = futures::join!(loader.load("a"), async {
            let seen = state.get().loading;
            tx.send(None).unwrap();
            seen
        });
        seen
    });

    assert!(seen_loading);
    assert!(!state.get().loading);
}
