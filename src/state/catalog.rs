//! Catalog state: the four carousel partitions.
//!
//! DESIGN
//! ======
//! A `CatalogState` is always built in one pass from one full collection
//! snapshot and published as a single value, so its four buckets can never
//! come from different snapshots. `generation` names that snapshot.
//!
//! Documents are coerced at this boundary. A document without a recognized
//! `type` is not an error: it is left out of every bucket and reported back
//! to the caller in `Partition::rejected`.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::net::types::{CollectionSnapshot, Document};

/// Carousel a catalog item belongs to (`type` field on the document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Recommend,
    New,
    Original,
    Trending,
}

impl ItemKind {
    pub const ALL: [Self; 4] = [Self::Recommend, Self::New, Self::Original, Self::Trending];

    /// Parse the document tag. Unknown tags yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "recommend" => Some(Self::Recommend),
            "new" => Some(Self::New),
            "original" => Some(Self::Original),
            "trending" => Some(Self::Trending),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommend => "recommend",
            Self::New => "new",
            Self::Original => "original",
            Self::Trending => "trending",
        }
    }

    /// Carousel heading.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Recommend => "Recommended for You",
            Self::New => "New to Disney+",
            Self::Original => "Originals",
            Self::Trending => "Trending",
        }
    }
}

/// Display fields shared by carousel tiles and the detail view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub title: String,
    pub card_img: String,
    pub background_img: String,
    pub title_img: String,
    pub sub_title: String,
    pub description: String,
}

impl MediaInfo {
    /// Read display fields from a document; non-string or missing values are empty.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let field = |key: &str| doc.str_field(key).unwrap_or_default().to_owned();
        Self {
            title: field("title"),
            card_img: field("cardImg"),
            background_img: field("backgroundImg"),
            title_img: field("titleImg"),
            sub_title: field("subTitle"),
            description: field("description"),
        }
    }
}

/// A typed catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: ItemKind,
    #[serde(flatten)]
    pub info: MediaInfo,
}

/// Why a document was left out of the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    MissingType,
    UnknownType(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingType => write!(f, "missing type"),
            Self::UnknownType(raw) => write!(f, "unknown type {raw:?}"),
        }
    }
}

impl CatalogItem {
    /// Coerce a store document into a catalog item.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectReason`] when `type` is missing, not a string, or
    /// not one of the four known kinds.
    pub fn from_document(doc: &Document) -> Result<Self, RejectReason> {
        let raw = doc.str_field("type").ok_or(RejectReason::MissingType)?;
        let kind = ItemKind::parse(raw).ok_or_else(|| RejectReason::UnknownType(raw.to_owned()))?;
        Ok(Self { id: doc.id.clone(), kind, info: MediaInfo::from_document(doc) })
    }
}

/// The four carousels built from one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub recommend: Vec<CatalogItem>,
    pub new_disney: Vec<CatalogItem>,
    pub original: Vec<CatalogItem>,
    pub trending: Vec<CatalogItem>,
    /// Snapshot counter assigned by the sync; 0 means nothing received yet.
    pub generation: u64,
}

impl CatalogState {
    #[must_use]
    pub fn bucket(&self, kind: ItemKind) -> &[CatalogItem] {
        match kind {
            ItemKind::Recommend => &self.recommend,
            ItemKind::New => &self.new_disney,
            ItemKind::Original => &self.original,
            ItemKind::Trending => &self.trending,
        }
    }

    fn bucket_mut(&mut self, kind: ItemKind) -> &mut Vec<CatalogItem> {
        match kind {
            ItemKind::Recommend => &mut self.recommend,
            ItemKind::New => &mut self.new_disney,
            ItemKind::Original => &mut self.original,
            ItemKind::Trending => &mut self.trending,
        }
    }

    /// Total items across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        ItemKind::ALL.iter().map(|k| self.bucket(*k).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of partitioning one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub catalog: CatalogState,
    /// Document ids left out, with the reason, in snapshot order.
    pub rejected: Vec<(String, RejectReason)>,
}

/// Build all four buckets from scratch from `snapshot`.
///
/// Each rejected document is logged at `warn`.
#[must_use]
pub fn partition_snapshot(snapshot: &CollectionSnapshot, generation: u64) -> Partition {
    let mut partition = Partition { catalog: CatalogState { generation, ..CatalogState::default() }, rejected: Vec::new() };

    for doc in &snapshot.documents {
        match CatalogItem::from_document(doc) {
            Ok(item) => partition.catalog.bucket_mut(item.kind).push(item),
            Err(reason) => {
                log::warn!("catalog document {} skipped: {reason}", doc.id);
                partition.rejected.push((doc.id.clone(), reason));
            }
        }
    }

    partition
}
