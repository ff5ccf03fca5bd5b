use super::*;
use serde_json::json;

// =============================================================
// AuthUser
// =============================================================

#[test]
fn auth_user_deserializes_provider_field_names() {
    let user: AuthUser = serde_json::from_value(json!({
        "displayName": "Ann",
        "email": "a@x.com",
        "photoURL": "https://img/ann.png"
    }))
    .unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Ann"));
    assert_eq!(user.email.as_deref(), Some("a@x.com"));
    assert_eq!(user.photo_url.as_deref(), Some("https://img/ann.png"));
}

#[test]
fn auth_user_tolerates_missing_and_null_fields() {
    let user: AuthUser = serde_json::from_value(json!({ "displayName": "Ann", "photoURL": null })).unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Ann"));
    assert!(user.email.is_none());
    assert!(user.photo_url.is_none());
}

// =============================================================
// Document
// =============================================================

#[test]
fn str_field_ignores_non_strings() {
    let fields = json!({ "title": "Up", "year": 2009 }).as_object().cloned().unwrap();
    let doc = Document::new("d1", fields);
    assert_eq!(doc.str_field("title"), Some("Up"));
    assert_eq!(doc.str_field("year"), None);
    assert_eq!(doc.str_field("missing"), None);
}

// =============================================================
// CollectionSnapshot
// =============================================================

#[test]
fn from_reads_skips_unreadable_documents() {
    let fields = json!({ "type": "new" }).as_object().cloned().unwrap();
    let snapshot = CollectionSnapshot::from_reads(vec![
        Ok(Document::new("a", fields.clone())),
        Err(ProviderError::Malformed("document has no id".to_owned())),
        Ok(Document::new("c", fields)),
    ]);
    assert_eq!(snapshot.documents.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
}

#[test]
fn from_reads_with_no_readable_documents_is_empty() {
    let snapshot = CollectionSnapshot::from_reads(vec![Err(ProviderError::Malformed("bad".to_owned()))]);
    assert!(snapshot.is_empty());
}

// =============================================================
// ProviderError
// =============================================================

#[test]
fn popup_closed_maps_to_cancelled() {
    assert_eq!(ProviderError::from_code("auth/popup-closed-by-user", "closed"), ProviderError::Cancelled);
}

#[test]
fn network_codes_map_to_network() {
    assert_eq!(
        ProviderError::from_code("auth/network-request-failed", "offline"),
        ProviderError::Network("offline".to_owned())
    );
}

#[test]
fn unknown_codes_keep_code_and_message() {
    let err = ProviderError::from_code("permission-denied", "nope");
    assert_eq!(err, ProviderError::Rejected { code: "permission-denied".to_owned(), message: "nope".to_owned() });
    assert_eq!(err.to_string(), "nope");
}
