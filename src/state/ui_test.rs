use super::*;

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(ui.notice.is_none());
    assert!(!ui.auth_pending);
}

#[test]
fn newer_notice_survives_older_dismiss() {
    let mut ui = UiState::default();
    let first = ui.show_notice("one");
    let second = ui.show_notice("two");
    assert_ne!(first, second);

    ui.dismiss_notice(first);
    assert_eq!(ui.notice.as_ref().map(|n| n.message.as_str()), Some("two"));
    ui.dismiss_notice(second);
    assert!(ui.notice.is_none());
}

#[test]
fn auth_failure_messages() {
    assert_eq!(auth_failure_message("Sign in", &ProviderError::Cancelled), "Sign in cancelled.");
    assert_eq!(
        auth_failure_message("Sign out", &ProviderError::Network("offline".to_owned())),
        "Sign out failed: network error: offline"
    );
}
