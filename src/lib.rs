//! # catalog-client
//!
//! Leptos + WASM frontend for a streaming catalog. Gates its pages on a
//! signed-in session and keeps the catalog in sync with a live document
//! collection.
//!
//! The core (`state`, `net`, `util`) is plain single-threaded Rust driven by
//! the provider traits in [`net::provider`], so it runs and is tested natively
//! against the in-memory adapters. `app`, `components`, and `pages` are the
//! Leptos view layer; the `csr` feature adds the Firebase adapters and the
//! browser entry point.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install logging and the panic hook, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
