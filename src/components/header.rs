//! Top bar with navigation links, the sign-in / sign-out button, and the
//! transient auth notice.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::state::session::SessionState;
use crate::state::ui::{UiState, auth_failure_message};

#[component]
pub fn Header() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let session = expect_context::<RwSignal<SessionState>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let signed_in = move || session.with(SessionState::is_signed_in);
    let pending = move || ui.with(|u| u.auth_pending);

    let on_sign_in = move |_| run_auth_action(services, ui, AuthAction::SignIn);
    let on_sign_out = move |_| run_auth_action(services, ui, AuthAction::SignOut);

    view! {
        <header class="header">
            <a href="/home" class="header__logo">
                "Disney+"
            </a>
            <Show when=signed_in>
                <nav class="header__nav">
                    <a href="/home">"Home"</a>
                </nav>
            </Show>
            <span class="header__spacer"></span>
            <Show
                when=signed_in
                fallback=move || {
                    view! {
                        <button class="btn header__login" disabled=pending on:click=on_sign_in>
                            "Login"
                        </button>
                    }
                }
            >
                <div class="header__user">
                    <img
                        class="header__avatar"
                        src=move || session.with(|s| s.photo_url().to_owned())
                        alt=move || session.with(|s| s.display_name().to_owned())
                    />
                    <span class="header__name">{move || session.with(|s| s.display_name().to_owned())}</span>
                    <button class="btn header__logout" disabled=pending on:click=on_sign_out>
                        "Sign out"
                    </button>
                </div>
            </Show>
            {move || {
                ui.with(|u| u.notice.clone())
                    .map(|n| {
                        view! {
                            <div class="header__notice" role="status">
                                {n.message}
                            </div>
                        }
                    })
            }}
        </header>
    }
}

#[derive(Clone, Copy)]
pub(crate) enum AuthAction {
    SignIn,
    SignOut,
}

impl AuthAction {
    fn label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignOut => "Sign out",
        }
    }
}

/// Run sign-in or sign-out through the auth listener and surface failures as
/// a notice.
pub(crate) fn run_auth_action(services: AppServices, ui: RwSignal<UiState>, action: AuthAction) {
    if ui.with_untracked(|u| u.auth_pending) {
        return;
    }
    let Some((listener, notice_ms)) = services.try_with_value(|s| (s.listener.clone(), s.notice_ms)) else {
        return;
    };
    ui.update(|u| u.auth_pending = true);

    leptos::task::spawn_local(async move {
        let result = match action {
            AuthAction::SignIn => listener.sign_in().await,
            AuthAction::SignOut => listener.sign_out().await,
        };
        ui.update(|u| u.auth_pending = false);
        if let Err(e) = result {
            post_notice(ui, auth_failure_message(action.label(), &e), notice_ms);
        }
    });
}

/// Show `message` and schedule its dismissal after `ttl_ms`.
fn post_notice(ui: RwSignal<UiState>, message: String, ttl_ms: u64) {
    let Some(id) = ui.try_update(|u| u.show_notice(message)) else {
        return;
    };

    #[cfg(feature = "csr")]
    {
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_millis(ttl_ms)).await;
            ui.update(|u| u.dismiss_notice(id));
        });
    }

    #[cfg(not(feature = "csr"))]
    {
        let _ = (id, ttl_ms);
    }
}
