//! Detail-view state for `/detail/:id`.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use super::catalog::{ItemKind, MediaInfo};
use crate::net::types::{Document, ProviderError};

/// One document's display fields. The kind is optional here: the detail
/// view shows any document the id points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailItem {
    pub id: String,
    pub kind: Option<ItemKind>,
    pub info: MediaInfo,
}

impl DetailItem {
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            kind: doc.str_field("type").and_then(ItemKind::parse),
            info: MediaInfo::from_document(doc),
        }
    }
}

/// What the detail view shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailView {
    #[default]
    Empty,
    Loaded(DetailItem),
    NotFound,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    /// Id of the most recent request.
    pub requested: Option<String>,
    pub loading: bool,
    pub view: DetailView,
}

impl DetailState {
    /// Start a read for `id`. The current view stays until a result lands.
    pub fn begin(&mut self, id: &str) {
        self.requested = Some(id.to_owned());
        self.loading = true;
    }

    /// Apply the result of a read for `id`. Returns `false` if the result is
    /// stale (a newer id was requested since) and was ignored.
    pub fn apply(&mut self, id: &str, result: Result<Option<Document>, ProviderError>) -> bool {
        if self.requested.as_deref() != Some(id) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(Some(doc)) => self.view = DetailView::Loaded(DetailItem::from_document(&doc)),
            Ok(None) => {
                log::info!("no catalog document with id {id}");
                self.view = DetailView::NotFound;
            }
            Err(e) => log::warn!("detail read for {id} failed: {e}"),
        }
        true
    }

    /// The loaded item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&DetailItem> {
        match &self.view {
            DetailView::Loaded(item) => Some(item),
            DetailView::Empty | DetailView::NotFound => None,
        }
    }
}
