//! Integration tests for the published-list query surface.

use list_curation_api::services::search_projection::{IndexSink, TracingSink};
use list_curation_api::services::{
    AccessService, CurationError, LifecycleService, SearchService, TopicService,
};
use list_curation_api::storage::{CurationStore, SqliteStore};
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
    store: Arc<dyn CurationStore>,
    topics: TopicService,
    lifecycle: LifecycleService,
    search: SearchService,
}

async fn fixture() -> Fixture {
    let store: Arc<dyn CurationStore> = Arc::new(SqliteStore::in_memory().unwrap());
    let index: Arc<dyn IndexSink> = Arc::new(TracingSink);
    let access = AccessService::new(store.clone());
    Fixture {
        topics: TopicService::new(store.clone(), index.clone()),
        lifecycle: LifecycleService::new(store.clone(), access, index),
        search: SearchService::new(store.clone()),
        store,
    }
}

/// Create a list under `topic` and walk it through to Published.
async fn published(fx: &Fixture, title: &str, topic: Uuid) -> Uuid {
    let creator = Uuid::new_v4();
    let editor = Uuid::new_v4();
    fx.store
        .upsert_person(editor, String::new(), String::new(), String::new())
        .await
        .unwrap();
    let group = fx.store.create_group(format!("editors-{editor}")).await.unwrap();
    fx.store.add_group_member(editor, group.id).await.unwrap();
    fx.store
        .create_subscription(group.id, topic, true, 0, None)
        .await
        .unwrap();

    let list = fx
        .lifecycle
        .create_list(creator, title.to_string(), String::new(), Some(topic))
        .await
        .unwrap();
    fx.lifecycle.submit(creator, list.id).await.unwrap();
    fx.lifecycle.claim(editor, list.id).await.unwrap();
    fx.lifecycle.publish(editor, list.id).await.unwrap();
    list.id
}

#[tokio::test]
async fn test_only_published_active_lists_show_up() {
    let fx = fixture().await;
    let topic = fx
        .topics
        .create_topic("Endocrinology".to_string(), String::new())
        .await
        .unwrap()
        .id;

    published(&fx, "Thyroid nodules", topic).await;

    // A draft with a matching title stays invisible.
    let creator = Uuid::new_v4();
    fx.lifecycle
        .create_list(creator, "Thyroid storm".to_string(), String::new(), Some(topic))
        .await
        .unwrap();

    let hits = fx.search.search_lists(Some("Thyroid"), None, None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].list.title, "Thyroid nodules");
    assert_eq!(hits[0].topic_name.as_deref(), Some("Endocrinology"));
}

#[tokio::test]
async fn test_deactivated_list_drops_out() {
    let fx = fixture().await;
    let topic = fx
        .topics
        .create_topic("Endocrinology".to_string(), String::new())
        .await
        .unwrap()
        .id;
    let list_id = published(&fx, "Adrenal crisis", topic).await;

    assert_eq!(fx.search.search_lists(Some("Adrenal"), None, None).await.unwrap().len(), 1);

    let creator = fx.store.get_list(list_id).await.unwrap().unwrap().creator.unwrap();
    fx.lifecycle.set_active(creator, list_id, false).await.unwrap();
    assert!(fx.search.search_lists(Some("Adrenal"), None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_topic_filter_expands_to_descendants() {
    let fx = fixture().await;
    let a = fx.topics.create_topic("Endocrinology".to_string(), String::new()).await.unwrap().id;
    let b = fx.topics.create_topic("Thyroid diseases".to_string(), String::new()).await.unwrap().id;
    let c = fx.topics.create_topic("Nodules".to_string(), String::new()).await.unwrap().id;
    let other = fx.topics.create_topic("Cardiology".to_string(), String::new()).await.unwrap().id;
    fx.topics.create_edge(a, b, String::new()).await.unwrap();
    fx.topics.create_edge(b, c, String::new()).await.unwrap();

    published(&fx, "Root list", a).await;
    published(&fx, "Mid list", b).await;
    published(&fx, "Leaf list", c).await;
    published(&fx, "Unrelated list", other).await;

    // Filtering on the root topic pulls in every descendant's lists.
    let hits = fx.search.search_lists(None, Some("Endocrin"), None).await.unwrap();
    let titles: Vec<_> = hits.iter().map(|h| h.list.title.as_str()).collect();
    assert_eq!(hits.len(), 3);
    assert!(!titles.contains(&"Unrelated list"));

    // A leaf topic matches only its own lists.
    let hits = fx.search.search_lists(None, Some("Nodules"), None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].list.title, "Leaf list");
}

#[tokio::test]
async fn test_unknown_topic_name_drops_filter() {
    let fx = fixture().await;
    let topic = fx.topics.create_topic("Endocrinology".to_string(), String::new()).await.unwrap().id;
    published(&fx, "Visible", topic).await;

    let hits = fx.search.search_lists(None, Some("no-such-topic"), None).await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn test_newest_first_and_limit() {
    let fx = fixture().await;
    let topic = fx.topics.create_topic("Endocrinology".to_string(), String::new()).await.unwrap().id;
    for n in 0..5 {
        published(&fx, &format!("List {n}"), topic).await;
        // Distinct creation timestamps keep the ordering observable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let hits = fx.search.search_lists(None, None, Some(3)).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].list.title, "List 4");
    assert_eq!(hits[1].list.title, "List 3");
    assert_eq!(hits[2].list.title, "List 2");
}

#[tokio::test]
async fn test_title_and_topic_combined() {
    let fx = fixture().await;
    let a = fx.topics.create_topic("Endocrinology".to_string(), String::new()).await.unwrap().id;
    let other = fx.topics.create_topic("Cardiology".to_string(), String::new()).await.unwrap().id;
    published(&fx, "Checklist one", a).await;
    published(&fx, "Checklist two", other).await;

    let hits = fx
        .search
        .search_lists(Some("Checklist"), Some("Endocrinology"), None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].list.title, "Checklist one");
}

#[tokio::test]
async fn test_published_item_listing_is_ordered() {
    let fx = fixture().await;
    let topic = fx.topics.create_topic("Endocrinology".to_string(), String::new()).await.unwrap().id;
    let creator = Uuid::new_v4();
    let list = fx
        .lifecycle
        .create_list(creator, "Workup".to_string(), String::new(), Some(topic))
        .await
        .unwrap();
    for title in ["TSH", "Free T4", "Ultrasound"] {
        fx.lifecycle
            .add_item(creator, list.id, title.to_string(), String::new(), String::new())
            .await
            .unwrap();
    }

    // Not published yet: the public item listing denies the row exists.
    let err = fx.search.published_list_items(list.id).await.unwrap_err();
    assert!(matches!(err, CurationError::NotFound { .. }));

    let editor = Uuid::new_v4();
    fx.store
        .upsert_person(editor, String::new(), String::new(), String::new())
        .await
        .unwrap();
    let group = fx.store.create_group("editors".to_string()).await.unwrap();
    fx.store.add_group_member(editor, group.id).await.unwrap();
    fx.store.create_subscription(group.id, topic, true, 0, None).await.unwrap();
    fx.lifecycle.submit(creator, list.id).await.unwrap();
    fx.lifecycle.claim(editor, list.id).await.unwrap();
    fx.lifecycle.publish(editor, list.id).await.unwrap();

    let items = fx.search.published_list_items(list.id).await.unwrap();
    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["TSH", "Free T4", "Ultrasound"]);
}
