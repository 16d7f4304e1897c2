//! Unit tests for the search index projection.

use list_curation_api::models::{EntityKind, List, ListStatus, TopicNode};
use list_curation_api::services::search_projection::{
    IndexOp, IndexSink, RecordingSink, project_list, project_topic, remove, upsert_list,
};
use serde_json::json;
use uuid::Uuid;

#[test]
fn test_list_document_fields() {
    let topic = Uuid::new_v4();
    let list = List::new(
        "Thyroid nodules".to_string(),
        "Workup checklist".to_string(),
        Some(topic),
        Some(Uuid::new_v4()),
    );

    let doc = project_list(&list);
    assert_eq!(doc.id, list.id);
    assert_eq!(doc.fields["title"], json!("Thyroid nodules"));
    assert_eq!(doc.fields["description"], json!("Workup checklist"));
    assert_eq!(doc.fields["topic_id"], json!(topic));
    assert_eq!(doc.fields["status"], json!("draft"));
    assert_eq!(doc.fields["active"], json!(true));
    assert_eq!(doc.fields["version"], json!(1));
    assert!(doc.fields.contains_key("created_at"));
}

#[test]
fn test_list_suggest_payload() {
    let list = List::new("Adrenal incidentaloma".to_string(), String::new(), None, None);
    let doc = project_list(&list);

    let suggest = &doc.fields["suggest"];
    assert_eq!(suggest["input"], json!(["Adrenal incidentaloma"]));
    assert_eq!(suggest["payload"]["id"], json!(list.id));
}

#[test]
fn test_topic_document_fields() {
    let topic = TopicNode::new("Endocrinology".to_string(), "Hormones".to_string());
    let doc = project_topic(&topic);

    assert_eq!(doc.id, topic.id);
    assert_eq!(doc.fields["name"], json!("Endocrinology"));
    assert_eq!(doc.fields["description"], json!("Hormones"));
    assert_eq!(doc.fields["suggest"]["input"], json!(["Endocrinology"]));
}

#[test]
fn test_projection_is_pure() {
    let list = List::new("Stable".to_string(), String::new(), None, None);
    let first = project_list(&list);
    let second = project_list(&list);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_status_changes_flow_into_document() {
    let mut list = List::new("Reviewed".to_string(), String::new(), None, None);
    list.status = ListStatus::Published;
    let doc = project_list(&list);
    assert_eq!(doc.fields["status"], json!("published"));
}

#[test]
fn test_recording_sink_collects_ops() {
    let sink = RecordingSink::new();
    let list = List::new("Tracked".to_string(), String::new(), None, None);

    sink.apply(upsert_list(&list));
    sink.apply(remove(EntityKind::List, list.id));

    let ops = sink.ops();
    assert_eq!(ops.len(), 2);
    match &ops[0] {
        IndexOp::Upsert { kind, document } => {
            assert_eq!(*kind, EntityKind::List);
            assert_eq!(document.id, list.id);
        }
        other => panic!("expected upsert, got {other:?}"),
    }
    match &ops[1] {
        IndexOp::Remove { kind, id } => {
            assert_eq!(*kind, EntityKind::List);
            assert_eq!(*id, list.id);
        }
        other => panic!("expected remove, got {other:?}"),
    }
}
