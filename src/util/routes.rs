//! Logical routes and the navigation seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Core components request navigation through [`Navigator`] instead of
//! calling the router directly, so they run unchanged under tests and in the
//! browser (see `util::navigation` for the Leptos bridge).

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::collections::VecDeque;

/// The three routes of the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated landing page.
    Entry,
    /// Protected carousel page.
    Catalog,
    /// Protected item detail page.
    Detail(String),
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Entry => "/".to_owned(),
            Self::Catalog => "/home".to_owned(),
            Self::Detail(id) => format!("/detail/{id}"),
        }
    }

    /// Parse a URL path. Unknown paths yield `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Entry),
            "/home" => Some(Self::Catalog),
            _ => {
                let id = trimmed.strip_prefix("/detail/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Some(Self::Detail(id.to_owned()))
            }
        }
    }
}

/// How a navigation treats browser history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    /// Replace the current entry so back does not return to it.
    Replace,
}

/// A navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub mode: HistoryMode,
}

impl Navigation {
    #[must_use]
    pub fn push(route: Route) -> Self {
        Self { route, mode: HistoryMode::Push }
    }

    #[must_use]
    pub fn replace(route: Route) -> Self {
        Self { route, mode: HistoryMode::Replace }
    }
}

/// Something that can carry out navigation requests.
pub trait Navigator {
    fn navigate(&self, nav: Navigation);
}

impl<F> Navigator for F
where
    F: Fn(Navigation),
{
    fn navigate(&self, nav: Navigation) {
        self(nav);
    }
}

/// Navigation requests posted since the last flush, oldest first.
///
/// Requests posted in one turn are performed together. Back-to-back requests
/// for the same route collapse into one, and a `Replace` among them wins so a
/// redirect away from a protected page never leaves that page in history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationQueue {
    pending: VecDeque<Navigation>,
}

impl NavigationQueue {
    pub fn post(&mut self, nav: Navigation) {
        if let Some(last) = self.pending.back_mut() {
            if last.route == nav.route {
                if nav.mode == HistoryMode::Replace {
                    last.mode = HistoryMode::Replace;
                }
                return;
            }
        }
        self.pending.push_back(nav);
    }

    /// Take every pending request in posting order.
    pub fn drain(&mut self) -> Vec<Navigation> {
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
