//! Firebase adapters for the browser build.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the Firebase compat SDK (`firebase.auth()`, `firebase.firestore()`)
//! loaded by `index.html`. The auth adapter wraps `onAuthStateChanged`,
//! `signInWithPopup` with a Google provider, and `signOut`. The store adapter
//! wraps `collection(..).onSnapshot` and `doc(..).get()`.
//!
//! ERROR HANDLING
//! ==============
//! Every JS failure becomes a `ProviderError`: SDK errors carry a `code` that
//! goes through `ProviderError::from_code`, a missing SDK is `Unavailable`,
//! and payloads that fail to convert are `Malformed`. Nothing here panics.
//!
//! JS callbacks are `Closure`s owned by the returned `Subscription`; releasing
//! it calls the SDK's unsubscribe function first and then frees the closures.

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::provider::{AuthHandler, AuthProvider, DocumentStore, SnapshotHandler};
use super::types::{AuthUser, CollectionSnapshot, Document, ProviderError};
use crate::config::FirebaseConfig;
use crate::util::subscription::Subscription;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = firebase, js_name = initializeApp, catch)]
    fn initialize_app(options: &JsValue) -> Result<JsValue, JsValue>;

    type Auth;

    #[wasm_bindgen(js_namespace = firebase, js_name = auth, catch)]
    fn firebase_auth() -> Result<Auth, JsValue>;

    #[wasm_bindgen(method, js_name = onAuthStateChanged)]
    fn on_auth_state_changed(this: &Auth, next: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

    #[wasm_bindgen(method, js_name = signInWithPopup)]
    fn sign_in_with_popup(this: &Auth, provider: &GoogleAuthProvider) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = signOut)]
    fn sign_out(this: &Auth) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["firebase", "auth"])]
    type GoogleAuthProvider;

    #[wasm_bindgen(constructor, js_namespace = ["firebase", "auth"])]
    fn new() -> GoogleAuthProvider;

    type Firestore;

    #[wasm_bindgen(js_namespace = firebase, js_name = firestore, catch)]
    fn firebase_firestore() -> Result<Firestore, JsValue>;

    #[wasm_bindgen(method)]
    fn collection(this: &Firestore, path: &str) -> CollectionRef;

    type CollectionRef;

    #[wasm_bindgen(method, js_name = onSnapshot)]
    fn on_snapshot(
        this: &CollectionRef,
        next: &Closure<dyn FnMut(JsValue)>,
        error: &Closure<dyn FnMut(JsValue)>,
    ) -> js_sys::Function;

    #[wasm_bindgen(method)]
    fn doc(this: &CollectionRef, id: &str) -> DocRef;

    type DocRef;

    #[wasm_bindgen(method)]
    fn get(this: &DocRef) -> js_sys::Promise;
}

/// Initialize the default Firebase app. Call once before building adapters.
///
/// # Errors
///
/// Returns `Unavailable` when the SDK is not loaded and the SDK's own error
/// when it rejects the options.
pub fn initialize(config: &FirebaseConfig) -> Result<(), ProviderError> {
    let json = serde_json::to_string(config).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let options = js_sys::JSON::parse(&json).map_err(|e| js_error(&e))?;
    initialize_app(&options).map_err(|e| js_error(&e))?;
    log::info!("firebase app initialized for project {}", config.project_id);
    Ok(())
}

// =============================================================================
// AUTH
// =============================================================================

pub struct FirebaseAuthProvider {
    auth: Auth,
}

impl FirebaseAuthProvider {
    /// # Errors
    ///
    /// Fails if the auth SDK is missing or the app is not initialized.
    pub fn connect() -> Result<Self, ProviderError> {
        let auth = firebase_auth().map_err(|e| js_error(&e))?;
        Ok(Self { auth })
    }
}

#[async_trait(?Send)]
impl AuthProvider for FirebaseAuthProvider {
    fn subscribe(&self, handler: AuthHandler) -> Subscription {
        let next = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| handler(read_user(&user)));
        let unsubscribe = self.auth.on_auth_state_changed(&next);
        Subscription::new(move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                log::warn!("auth unsubscribe failed: {}", js_error(&e));
            }
            drop(next);
        })
    }

    async fn sign_in_interactive(&self) -> Result<AuthUser, ProviderError> {
        let provider = GoogleAuthProvider::new();
        let result = JsFuture::from(self.auth.sign_in_with_popup(&provider))
            .await
            .map_err(|e| js_error(&e))?;
        let user = get(&result, "user");
        read_user(&user).ok_or_else(|| ProviderError::Malformed("sign-in result has no user".to_owned()))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        JsFuture::from(self.auth.sign_out()).await.map_err(|e| js_error(&e))?;
        Ok(())
    }
}

// =============================================================================
// FIRESTORE
// =============================================================================

pub struct FirestoreDocumentStore {
    db: Firestore,
}

impl FirestoreDocumentStore {
    /// # Errors
    ///
    /// Fails if the Firestore SDK is missing or the app is not initialized.
    pub fn connect() -> Result<Self, ProviderError> {
        let db = firebase_firestore().map_err(|e| js_error(&e))?;
        Ok(Self { db })
    }
}

#[async_trait(?Send)]
impl DocumentStore for FirestoreDocumentStore {
    fn subscribe_collection(&self, collection: &str, handler: SnapshotHandler) -> Subscription {
        let on_next = handler.clone();
        let next = Closure::<dyn FnMut(JsValue)>::new(move |snap: JsValue| on_next(read_snapshot(&snap)));
        let on_error = handler;
        let error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| on_error(Err(js_error(&err))));

        let unsubscribe = self.db.collection(collection).on_snapshot(&next, &error);
        let name = collection.to_owned();
        Subscription::new(move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                log::warn!("unsubscribe from {name} failed: {}", js_error(&e));
            }
            drop(next);
            drop(error);
        })
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, ProviderError> {
        let promise = self.db.collection(collection).doc(id).get();
        let snap = JsFuture::from(promise).await.map_err(|e| js_error(&e))?;
        if !get(&snap, "exists").as_bool().unwrap_or(false) {
            return Ok(None);
        }
        read_document(&snap).map(Some)
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn get(target: &JsValue, key: &str) -> JsValue {
    js_sys::Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn get_string(target: &JsValue, key: &str) -> Option<String> {
    get(target, key).as_string()
}

fn read_user(user: &JsValue) -> Option<AuthUser> {
    if user.is_null() || user.is_undefined() {
        return None;
    }
    Some(AuthUser {
        display_name: get_string(user, "displayName"),
        email: get_string(user, "email"),
        photo_url: get_string(user, "photoURL"),
    })
}

fn read_snapshot(snap: &JsValue) -> Result<CollectionSnapshot, ProviderError> {
    let docs: js_sys::Array = get(snap, "docs")
        .dyn_into()
        .map_err(|_| ProviderError::Malformed("snapshot has no docs array".to_owned()))?;
    Ok(CollectionSnapshot::from_reads(docs.iter().map(|doc| read_document(&doc))))
}

/// Read `{ id, data() }` from a Firestore document snapshot.
fn read_document(doc: &JsValue) -> Result<Document, ProviderError> {
    let id = get_string(doc, "id").ok_or_else(|| ProviderError::Malformed("document has no id".to_owned()))?;
    let data_fn: js_sys::Function = get(doc, "data")
        .dyn_into()
        .map_err(|_| ProviderError::Malformed(format!("document {id} has no data()")))?;
    let data = data_fn.call0(doc).map_err(|e| js_error(&e))?;
    let json: String = js_sys::JSON::stringify(&data)
        .map_err(|e| js_error(&e))?
        .into();
    let fields = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&json)
        .map_err(|e| ProviderError::Malformed(format!("document {id}: {e}")))?;
    Ok(Document::new(id, fields))
}

/// Convert a thrown JS value into a `ProviderError`.
fn js_error(err: &JsValue) -> ProviderError {
    let message = get_string(err, "message").or_else(|| err.as_string()).unwrap_or_else(|| format!("{err:?}"));
    match get_string(err, "code") {
        Some(code) => ProviderError::from_code(&code, &message),
        None if err.is_instance_of::<js_sys::ReferenceError>() => ProviderError::Unavailable(message),
        None => ProviderError::Rejected { code: "unknown".to_owned(), message },
    }
}
