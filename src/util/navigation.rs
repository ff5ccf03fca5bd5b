//! Router bridge for core navigation requests.
//!
//! Core components navigate through [`Navigator`], which may fire from any
//! provider callback. The navigator here only queues the request in a
//! signal; [`NavigationOutlet`], mounted inside `<Router>`, drains the queue
//! and performs each request with `leptos_router`'s navigate.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use super::routes::{HistoryMode, Navigation, NavigationQueue, Navigator, Route};

/// Pending navigation requests, provided as context by the app root.
#[derive(Clone, Copy)]
pub struct NavigationRequests(RwSignal<NavigationQueue>);

impl NavigationRequests {
    #[must_use]
    pub fn new() -> Self {
        Self(RwSignal::new(NavigationQueue::default()))
    }

    /// A navigator that posts into this queue.
    #[must_use]
    pub fn navigator(self) -> Rc<dyn Navigator> {
        let queue = self.0;
        Rc::new(move |nav: Navigation| queue.update(|q| q.post(nav)))
    }
}

impl Default for NavigationRequests {
    fn default() -> Self {
        Self::new()
    }
}

/// Performs queued navigation requests. Renders nothing.
#[component]
pub fn NavigationOutlet() -> impl IntoView {
    let NavigationRequests(queue) = expect_context::<NavigationRequests>();
    let navigate = use_navigate();
    let location = use_location();

    Effect::new(move || {
        if queue.with(NavigationQueue::is_empty) {
            return;
        }
        let pending = queue.try_update_untracked(NavigationQueue::drain).unwrap_or_default();
        for nav in pending {
            let current = Route::parse(&location.pathname.get_untracked());
            if nav.mode == HistoryMode::Push && current.as_ref() == Some(&nav.route) {
                continue;
            }
            let replace = nav.mode == HistoryMode::Replace;
            navigate(&nav.route.path(), NavigateOptions { replace, ..NavigateOptions::default() });
        }
    });
}
