//! Item detail loader: point reads for `/detail/:id`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the detail page. Each route change calls [`DetailLoader::load`],
//! which records the requested id, reads the document once and applies the
//! result. A response that arrives after a newer id was requested is dropped.

#[cfg(test)]
#[path = "detail_loader_test.rs"]
mod detail_loader_test;

use std::rc::Rc;

use super::provider::DocumentStore;
use crate::state::detail::DetailState;
use crate::state::store::{Store, StoreWriter};

pub struct DetailLoader {
    store: Rc<dyn DocumentStore>,
    collection: String,
    state: StoreWriter<DetailState>,
}

impl DetailLoader {
    #[must_use]
    pub fn new(store: Rc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        let (state, _) = Store::new(DetailState::default());
        Self { store, collection: collection.into(), state }
    }

    #[must_use]
    pub fn state(&self) -> Store<DetailState> {
        self.state.reader()
    }

    /// Read `id` and publish the outcome. Returns `false` when the response
    /// was stale and discarded.
    pub async fn load(&self, id: &str) -> bool {
        self.update(|s| {
            s.begin(id);
            true
        });
        let result = self.store.get_document(&self.collection, id).await;
        let applied = self.update(|s| s.apply(id, result));
        if !applied {
            log::debug!("discarding stale detail response for {id}");
        }
        applied
    }

    fn update(&self, f: impl FnOnce(&mut DetailState) -> bool) -> bool {
        let mut next = (*self.state.get()).clone();
        let changed = f(&mut next);
        if changed {
            self.state.replace(next);
        }
        changed
    }
}
