//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::header::Header;
use crate::components::protected_route::ProtectedRoute;
use crate::config::ClientConfig;
use crate::net::auth_listener::AuthEventListener;
use crate::net::memory::{MemoryAuthProvider, MemoryDocumentStore};
use crate::net::provider::{AuthProvider, DocumentStore};
use crate::net::types::AuthUser;
use crate::pages::{detail::DetailPage, home::HomePage, login::LoginPage};
use crate::state::session::SessionState;
use crate::state::store::Store;
use crate::state::ui::UiState;
use crate::util::mirror::mirror_store;
use crate::util::navigation::{NavigationOutlet, NavigationRequests};

/// Non-`Send` collaborators shared by every page.
pub struct Services {
    pub auth: Rc<dyn AuthProvider>,
    pub docs: Rc<dyn DocumentStore>,
    pub listener: AuthEventListener,
    pub session: Store<SessionState>,
    pub collection: String,
    pub notice_ms: u64,
}

/// Context handle onto [`Services`]; the value lives in the root owner.
pub type AppServices = StoredValue<Services, LocalStorage>;

/// Root application component.
///
/// Builds config and collaborators, attaches the auth listener for the
/// lifetime of the app, and mirrors session state into a signal for the view.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env().unwrap_or_else(|e| {
        log::error!("invalid client config, using defaults: {e}");
        ClientConfig::default()
    });

    let requests = NavigationRequests::new();
    provide_context(requests);

    let (auth, docs) = connect(&config);
    let (writer, session_store) = Store::new(SessionState::default());
    let listener = AuthEventListener::attach(auth.clone(), writer, requests.navigator());

    let session = mirror_store(&session_store);

    let services: AppServices = StoredValue::new_local(Services {
        auth,
        docs,
        listener,
        session: session_store,
        collection: config.collection,
        notice_ms: config.notice_ms,
    });

    provide_context(services);
    provide_context(session);
    provide_context(RwSignal::new(UiState::default()));

    view! {
        <Title text="Disney+"/>

        <Router>
            <NavigationOutlet/>
            <Header/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=LoginPage/>
                    <Route
                        path=StaticSegment("home")
                        view=|| view! { <ProtectedRoute><HomePage/></ProtectedRoute> }
                    />
                    <Route
                        path=(StaticSegment("detail"), ParamSegment("id"))
                        view=|| view! { <ProtectedRoute><DetailPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

/// Pick collaborators: Firebase when configured in the browser build,
/// otherwise the in-memory adapters with a guest account.
fn connect(config: &ClientConfig) -> (Rc<dyn AuthProvider>, Rc<dyn DocumentStore>) {
    #[cfg(feature = "csr")]
    {
        if let Some(firebase) = &config.firebase {
            match connect_firebase(firebase) {
                Ok(pair) => return pair,
                Err(e) => log::error!("firebase unavailable, using in-memory collaborators: {e}"),
            }
        }
    }

    #[cfg(not(feature = "csr"))]
    {
        if config.firebase.is_some() {
            log::warn!("firebase config ignored outside the browser build");
        }
    }

    log::info!("using in-memory auth provider and document store");
    let auth = MemoryAuthProvider::new();
    auth.set_interactive_user(AuthUser {
        display_name: Some("Guest".to_owned()),
        email: Some("guest@localhost".to_owned()),
        photo_url: None,
    });
    (Rc::new(auth), Rc::new(MemoryDocumentStore::new()))
}

#[cfg(feature = "csr")]
fn connect_firebase(
    firebase: &crate::config::FirebaseConfig,
) -> Result<(Rc<dyn AuthProvider>, Rc<dyn DocumentStore>), crate::net::types::ProviderError> {
    use crate::net::firebase::{FirebaseAuthProvider, FirestoreDocumentStore, initialize};

    initialize(firebase)?;
    let auth = FirebaseAuthProvider::connect()?;
    let docs = FirestoreDocumentStore::connect()?;
    Ok((Rc::new(auth), Rc::new(docs)))
}
