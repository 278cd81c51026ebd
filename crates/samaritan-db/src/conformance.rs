//! Behaviour every `Store` implementation must share.

use serde_json::{Value, json};

use crate::{Document, Filter, Projection, Store, StoreError, UpdateOp};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn get_distinguishes_missing_from_empty(store: &dyn Store) {
    assert!(store.get("issues", "nope").unwrap().is_none());

    store.put("issues", "blank", Document::new()).unwrap();
    let found = store.get("issues", "blank").unwrap();
    assert_eq!(found, Some(Document::new()));
}

pub fn scan_filters_and_projects(store: &dyn Store) {
    assert!(store.scan("issues", None, None).unwrap().is_empty());

    store
        .put("issues", "1", doc(json!({ "Id": "1", "UserID": "u1", "Title": "a", "Body": "x" })))
        .unwrap();
    store
        .put("issues", "2", doc(json!({ "Id": "2", "UserID": "u2", "Title": "b", "Body": "y" })))
        .unwrap();
    store
        .put("issues", "3", doc(json!({ "Id": "3", "UserID": "u1", "Title": "c", "Body": "z" })))
        .unwrap();

    assert_eq!(store.scan("issues", None, None).unwrap().len(), 3);

    let filter = Filter::eq("UserID", "u1");
    let projection = Projection::new(["Id", "Title"]);
    let mut rows = store.scan("issues", Some(&filter), Some(&projection)).unwrap();
    rows.sort_by(|a, b| a["Id"].as_str().cmp(&b["Id"].as_str()));

    assert_eq!(
        rows.into_iter().map(Value::Object).collect::<Vec<_>>(),
        vec![json!({ "Id": "1", "Title": "a" }), json!({ "Id": "3", "Title": "c" })]
    );

    // Other tables are untouched
    assert!(store.scan("users", None, None).unwrap().is_empty());
}

pub fn insert_is_create_if_absent(store: &dyn Store) {
    store
        .insert("user_emails", "a@b.c", doc(json!({ "UserID": "first" })))
        .unwrap();

    let err = store
        .insert("user_emails", "a@b.c", doc(json!({ "UserID": "second" })))
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { .. }));

    let kept = store.get("user_emails", "a@b.c").unwrap().unwrap();
    assert_eq!(kept["UserID"], json!("first"));
}

pub fn update_applies_ops_to_existing_records_only(store: &dyn Store) {
    let missing = store
        .update("users", "ghost", &[UpdateOp::set("LastLogin", "now")])
        .unwrap();
    assert!(missing.is_none());
    assert!(store.get("users", "ghost").unwrap().is_none());

    store
        .put("users", "u1", doc(json!({ "Id": "u1", "SamaritanPoints": 10 })))
        .unwrap();

    let updated = store
        .update(
            "users",
            "u1",
            &[
                UpdateOp::append("UserHelps", vec![json!("i1")]),
                UpdateOp::add("SamaritanPoints", 5),
                UpdateOp::set("LastLogin", "later"),
            ],
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated["UserHelps"], json!(["i1"]));
    assert_eq!(updated["SamaritanPoints"], json!(15));
    assert_eq!(updated["LastLogin"], json!("later"));
    assert_eq!(store.get("users", "u1").unwrap().unwrap(), updated);
}

pub fn rejected_update_is_not_partially_applied(store: &dyn Store) {
    store
        .put("users", "u1", doc(json!({ "Id": "u1", "Name": "n" })))
        .unwrap();

    let err = store
        .update(
            "users",
            "u1",
            &[
                UpdateOp::append("UserHelps", vec![json!("i1")]),
                UpdateOp::add("SamaritanPoints", 5),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidUpdate { .. }));

    let stored = store.get("users", "u1").unwrap().unwrap();
    assert!(stored.get("UserHelps").is_none());
}
