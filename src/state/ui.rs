#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::net::types::ProviderError;

/// Transient, non-blocking notice shown by the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Monotonic id so an auto-dismiss timer only clears its own notice.
    pub id: u64,
    pub message: String,
}

/// UI-only state shared by the layout components.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub notice: Option<Notice>,
    /// A sign-in/sign-out call is in flight.
    pub auth_pending: bool,
    next_notice_id: u64,
}

impl UiState {
    /// Show a notice, replacing any current one. Returns its id.
    pub fn show_notice(&mut self, message: impl Into<String>) -> u64 {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notice = Some(Notice { id, message: message.into() });
        id
    }

    /// Clear the notice if it is still the one with `id`.
    pub fn dismiss_notice(&mut self, id: u64) {
        if self.notice.as_ref().is_some_and(|n| n.id == id) {
            self.notice = None;
        }
    }
}

/// User-facing text for a failed sign-in or sign-out.
#[must_use]
pub fn auth_failure_message(action: &str, err: &ProviderError) -> String {
    match err {
        ProviderError::Cancelled => format!("{action} cancelled."),
        other => format!("{action} failed: {other}"),
    }
}
