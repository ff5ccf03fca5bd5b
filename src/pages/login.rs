//! Entry page shown at `/` before sign-in.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::components::header::{AuthAction, run_auth_action};
use crate::state::ui::UiState;

/// Landing page. A successful sign-in moves the user on to `/home`.
#[component]
pub fn LoginPage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let ui = expect_context::<RwSignal<UiState>>();
    let pending = move || ui.with(|u| u.auth_pending);

    view! {
        <div class="login-page">
            <div class="login-page__cta">
                <img class="login-page__logo" src="/images/cta-logo-one.svg" alt="Disney+ Star Wars Marvel"/>
                <button
                    class="btn login-page__sign-up"
                    disabled=pending
                    on:click=move |_| run_auth_action(services, ui, AuthAction::SignIn)
                >
                    "Get all there"
                </button>
                <p class="login-page__description">
                    "Sign in to browse recommended, new, original, and trending titles."
                </p>
            </div>
        </div>
    }
}
