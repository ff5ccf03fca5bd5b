//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `catalog`, `detail`, `ui`) so
//! individual components depend on small focused models. `session` and
//! `catalog` live in a [`store::Store`] with one designated writer each.

pub mod catalog;
pub mod detail;
pub mod session;
pub mod store;
pub mod ui;
