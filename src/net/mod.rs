//! Collaborator seams, their adapters, and the session-gated sync services.
//!
//! DESIGN
//! ======
//! `provider` defines the traits; `memory` and `firebase` implement them.
//! `auth_listener`, `catalog_sync`, and `detail_loader` are the only code that
//! talks to a provider, and each owns the writer of the state it maintains.

pub mod auth_listener;
pub mod catalog_sync;
pub mod detail_loader;
#[cfg(feature = "csr")]
pub mod firebase;
pub mod memory;
pub mod provider;
pub mod types;
