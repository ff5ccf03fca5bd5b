//! Route wrapper that mounts a route guard and renders its children only
//! once the guard admits.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::util::guard::{GuardState, RouteGuard};
use crate::util::mirror::mirror_store;
use crate::util::navigation::NavigationRequests;

/// One guard per mount. The guard (and with it the provider subscription
/// and session observer) is released when this component is unmounted.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let services = expect_context::<AppServices>();
    let navigator = expect_context::<NavigationRequests>().navigator();

    let guard = services.try_with_value(|s| RouteGuard::mount(s.auth.as_ref(), &s.session, navigator));
    let state = guard.as_ref().map(|g| mirror_store(&g.state_store()));
    StoredValue::new_local(guard);

    let admitted = move || state.is_some_and(|s| s.get() == GuardState::Admitted);

    view! {
        <Show when=admitted fallback=|| view! { <div class="guard__checking"></div> }>
            {children()}
        </Show>
    }
}
