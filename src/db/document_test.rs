//! Tests for document matching, sorting, updates and grouping.

use crate::db::document::*;
use serde_json::{Value, json};

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

#[test]
fn filter_matches_every_field() {
    let d = doc(json!({"_id": "a", "listId": "l1", "completed": false}));
    assert!(Filter::new().matches(&d));
    assert!(Filter::by_id("a").eq("listId", "l1").matches(&d));
    assert!(!Filter::by_id("a").eq("listId", "l2").matches(&d));
    assert!(!Filter::new().eq("completed", 0).matches(&d));
}

#[test]
fn null_filter_matches_missing_field() {
    let d = doc(json!({"_id": "a"}));
    assert!(Filter::new().eq("order", Value::Null).matches(&d));
    assert!(!Filter::new().eq("order", 1).matches(&d));
}

#[test]
fn sort_places_nulls_first_ascending_and_last_descending() {
    let mut docs = vec![
        doc(json!({"_id": "b", "order": 2})),
        doc(json!({"_id": "none"})),
        doc(json!({"_id": "a", "order": 1})),
    ];

    sort_documents(&mut docs, &SortSpec::new("order", SortDirection::Asc));
    let ids: Vec<_> = docs.iter().filter_map(document_id).collect();
    assert_eq!(ids, vec!["none", "a", "b"]);

    sort_documents(&mut docs, &SortSpec::new("order", SortDirection::Desc));
    let ids: Vec<_> = docs.iter().filter_map(document_id).collect();
    assert_eq!(ids, vec!["b", "a", "none"]);
}

#[test]
fn sort_keeps_storage_order_for_ties() {
    let mut docs = vec![
        doc(json!({"_id": "first", "createdAt": "2025-01-01T00:00:00.000Z"})),
        doc(json!({"_id": "second", "createdAt": "2025-01-01T00:00:00.000Z"})),
        doc(json!({"_id": "early", "createdAt": "2024-12-31T00:00:00.000Z"})),
    ];
    sort_documents(&mut docs, &SortSpec::new("createdAt", SortDirection::Asc));
    let ids: Vec<_> = docs.iter().filter_map(document_id).collect();
    assert_eq!(ids, vec!["early", "first", "second"]);
}

#[test]
fn update_never_rewrites_id() {
    let mut d = doc(json!({"_id": "a", "text": "old"}));
    Update::set("_id", "b").and_set("text", "new").apply_to(&mut d);
    assert_eq!(d["_id"], "a");
    assert_eq!(d["text"], "new");
}

#[test]
fn upsert_document_merges_halves_with_set_winning() {
    let update = Update::set("text", "from set")
        .on_insert("text", "from insert")
        .on_insert("createdAt", "now");
    let d = update.upsert_document(&Filter::by_id("x"));
    assert_eq!(d["_id"], "x");
    assert_eq!(d["text"], "from set");
    assert_eq!(d["createdAt"], "now");
}

#[test]
fn upsert_document_generates_id_without_filter_id() {
    let d = Update::set("text", "t").upsert_document(&Filter::new());
    assert!(document_id(&d).is_some_and(|id| !id.is_empty()));
}

#[test]
fn group_push_round_trips_through_pipeline_form() {
    let pipeline = vec![json!({
        "$group": {
            "_id": "$listId",
            "items": { "$push": { "id": "$_id", "text": "$text" } }
        }
    })];
    let group = GroupPush::parse(&pipeline).expect("recognized");
    assert_eq!(group.group_by, "listId");
    assert_eq!(group.output, "items");
    assert_eq!(GroupPush::parse(&group.to_pipeline()), Some(group));
}

#[test]
fn unrecognized_pipelines_are_rejected() {
    assert!(GroupPush::parse(&[]).is_none());
    assert!(GroupPush::parse(&[json!({"$match": {"listId": "a"}})]).is_none());
    assert!(GroupPush::parse(&[json!({"$group": {"_id": "$listId", "n": {"$sum": 1}}})]).is_none());
    assert!(GroupPush::parse(&[json!({"$group": {"_id": "listId", "items": {"$push": {"id": "$_id"}}}})]).is_none());
}

#[test]
fn group_push_groups_in_first_seen_order() {
    let group = GroupPush {
        group_by: "listId".to_string(),
        output: "items".to_string(),
        projection: vec![("id".to_string(), "_id".to_string())],
    };
    let docs = [
        doc(json!({"_id": "1", "listId": "b"})),
        doc(json!({"_id": "2", "listId": "a"})),
        doc(json!({"_id": "3", "listId": "b"})),
    ];
    let summaries = group.apply(docs.iter());
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["_id"], "b");
    assert_eq!(summaries[0]["items"], json!([{"id": "1"}, {"id": "3"}]));
    assert_eq!(summaries[1]["items"], json!([{"id": "2"}]));
}
