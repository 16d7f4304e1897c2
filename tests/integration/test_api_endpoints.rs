//! HTTP-level integration tests over the full router.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use list_curation_api::routes::{create_api_router, create_app_state};
use serde_json::{Value, json};
use uuid::Uuid;

fn create_test_server() -> TestServer {
    let app_state = create_app_state().unwrap();
    let router = axum::Router::new()
        .nest("/api/v1", create_api_router())
        .with_state(app_state);
    TestServer::new(router).unwrap()
}

fn user_header(user: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&user.to_string()).unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/api/v1/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "list-curation-api");
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let server = create_test_server();
    let response = server.get("/api/v1/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body.get("paths").is_some());
}

#[tokio::test]
async fn test_mutations_require_identity() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/topics")
        .json(&json!({"name": "Endocrinology"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_identity_rejected() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/topics")
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .json(&json!({"name": "Endocrinology"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_topic_edge_validation() {
    let server = create_test_server();
    let admin = Uuid::new_v4();
    let (name, value) = user_header(admin);

    let topic: Value = server
        .post("/api/v1/topics")
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Endocrinology"}))
        .await
        .json();
    let topic_id = topic["id"].as_str().unwrap().to_string();

    // Self-loop fails validation before persistence.
    let response = server
        .post("/api/v1/topics/edges")
        .add_header(name.clone(), value.clone())
        .json(&json!({"parent_id": topic_id, "child_id": topic_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // Unknown endpoint node is NotFound.
    let response = server
        .post("/api/v1/topics/edges")
        .add_header(name, value)
        .json(&json!({"parent_id": topic_id, "child_id": Uuid::new_v4()}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_topic_is_not_found() {
    let server = create_test_server();
    let response = server.get(&format!("/api/v1/topics/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

/// End-to-end editorial flow over HTTP: taxonomy, subscription, draft,
/// submit, claim, publish, search.
#[tokio::test]
async fn test_full_editorial_flow() {
    let server = create_test_server();
    let admin = Uuid::new_v4();
    let creator = Uuid::new_v4();
    let editor = Uuid::new_v4();
    let (admin_h, admin_v) = user_header(admin);
    let (creator_h, creator_v) = user_header(creator);
    let (editor_h, editor_v) = user_header(editor);

    // Taxonomy: Endocrinology -> Thyroid
    let parent: Value = server
        .post("/api/v1/topics")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "Endocrinology"}))
        .await
        .json();
    let parent_id = parent["id"].as_str().unwrap().to_string();

    let child: Value = server
        .post("/api/v1/topics")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "Thyroid diseases"}))
        .await
        .json();
    let child_id = child["id"].as_str().unwrap().to_string();

    let response = server
        .post("/api/v1/topics/edges")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"parent_id": parent_id, "child_id": child_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let descendants: Value = server
        .get(&format!("/api/v1/topics/{parent_id}/descendants"))
        .await
        .json();
    assert_eq!(descendants["rows"].as_array().unwrap().len(), 1);

    // Editor group subscribed with edit power at the parent topic.
    let group: Value = server
        .post("/api/v1/groups")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "thyroid-editors"}))
        .await
        .json();
    let group_id = group["id"].as_str().unwrap().to_string();
    let response = server
        .post(&format!("/api/v1/groups/{group_id}/members/{editor}"))
        .add_header(admin_h.clone(), admin_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let response = server
        .post("/api/v1/subscriptions")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({
            "group_id": group_id,
            "topic_id": parent_id,
            "edit_power": true,
            "price_cents": 9900
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    // Draft under the child topic, with ordered items.
    let list: Value = server
        .post("/api/v1/lists")
        .add_header(creator_h.clone(), creator_v.clone())
        .json(&json!({"title": "Thyroid nodule workup", "topic_id": child_id}))
        .await
        .json();
    let list_id = list["id"].as_str().unwrap().to_string();
    assert_eq!(list["status"], "draft");
    assert_eq!(list["version"], 1);

    for title in ["TSH", "Ultrasound"] {
        let response = server
            .post(&format!("/api/v1/lists/{list_id}/items"))
            .add_header(creator_h.clone(), creator_v.clone())
            .json(&json!({"title": title}))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    // Drafts are invisible to other users and to anonymous readers.
    let response = server
        .get(&format!("/api/v1/lists/{list_id}"))
        .add_header(editor_h.clone(), editor_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let response = server.get(&format!("/api/v1/lists/{list_id}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Submit; a non-creator cannot.
    let response = server
        .post(&format!("/api/v1/lists/{list_id}/submit"))
        .add_header(editor_h.clone(), editor_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let submitted: Value = server
        .post(&format!("/api/v1/lists/{list_id}/submit"))
        .add_header(creator_h.clone(), creator_v.clone())
        .await
        .json();
    assert_eq!(submitted["status"], "submitted");

    // Claim via inherited editor scope; creator is no editor.
    let response = server
        .post(&format!("/api/v1/lists/{list_id}/claim"))
        .add_header(creator_h.clone(), creator_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let claimed: Value = server
        .post(&format!("/api/v1/lists/{list_id}/claim"))
        .add_header(editor_h.clone(), editor_v.clone())
        .await
        .json();
    assert_eq!(claimed["lock_user"], json!(editor.to_string()));

    // Content is frozen during review.
    let response = server
        .put(&format!("/api/v1/lists/{list_id}"))
        .add_header(creator_h.clone(), creator_v.clone())
        .json(&json!({"title": "Renamed", "topic_id": child_id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Publish clears the lock.
    let published: Value = server
        .post(&format!("/api/v1/lists/{list_id}/publish"))
        .add_header(editor_h.clone(), editor_v.clone())
        .await
        .json();
    assert_eq!(published["status"], "published");
    assert!(published.get("lock_user").is_none());

    // Anonymous readers see the published list and its ordered items.
    let response = server.get(&format!("/api/v1/lists/{list_id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let items: Value = server.get(&format!("/api/v1/lists/{list_id}/items")).await.json();
    let titles: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["TSH", "Ultrasound"]);

    // Search by title, with topic expansion from the parent.
    let results: Value = server
        .get("/api/v1/lists/search?title=nodule&topic=Endocrin")
        .await
        .json();
    let lists = results["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["topic_name"], "Thyroid diseases");

    // Publish is terminal: further change goes through a clone.
    let response = server
        .post(&format!("/api/v1/lists/{list_id}/submit"))
        .add_header(creator_h.clone(), creator_v.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let clone: Value = server
        .post(&format!("/api/v1/lists/{list_id}/clone"))
        .add_header(creator_h.clone(), creator_v.clone())
        .await
        .json();
    assert_eq!(clone["status"], "draft");
    assert_eq!(clone["version"], 2);
    assert_eq!(clone["parent_list"], json!(list_id));
}

#[tokio::test]
async fn test_review_workflow_over_http() {
    let server = create_test_server();
    let admin = Uuid::new_v4();
    let editor = Uuid::new_v4();
    let proposer = Uuid::new_v4();
    let claimer = Uuid::new_v4();
    let (admin_h, admin_v) = user_header(admin);
    let (editor_h, editor_v) = user_header(editor);
    let (proposer_h, proposer_v) = user_header(proposer);
    let (claimer_h, claimer_v) = user_header(claimer);

    let topic: Value = server
        .post("/api/v1/topics")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "Endocrinology"}))
        .await
        .json();
    let topic_id = topic["id"].as_str().unwrap().to_string();

    let group: Value = server
        .post("/api/v1/groups")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "editors"}))
        .await
        .json();
    let group_id = group["id"].as_str().unwrap().to_string();
    server
        .post(&format!("/api/v1/groups/{group_id}/members/{editor}"))
        .add_header(admin_h.clone(), admin_v.clone())
        .await;
    server
        .post("/api/v1/subscriptions")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"group_id": group_id, "topic_id": topic_id, "edit_power": true}))
        .await;

    let proposal: Value = server
        .post("/api/v1/proposals")
        .add_header(proposer_h.clone(), proposer_v.clone())
        .json(&json!({
            "target_kind": "topic",
            "target_id": topic_id,
            "message": "needs a starter list",
            "suggested_reward_cents": 2500
        }))
        .await
        .json();
    let proposal_id = proposal["id"].as_str().unwrap().to_string();
    assert!(proposal.get("bounty_id").is_none());

    // Proposer lacks editor scope.
    let response = server
        .post(&format!("/api/v1/proposals/{proposal_id}/issue-bounty"))
        .add_header(proposer_h, proposer_v)
        .json(&json!({"reward_cents": 2000}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let bounty: Value = server
        .post(&format!("/api/v1/proposals/{proposal_id}/issue-bounty"))
        .add_header(editor_h.clone(), editor_v.clone())
        .json(&json!({"reward_cents": 2000}))
        .await
        .json();
    let bounty_id = bounty["id"].as_str().unwrap().to_string();
    assert_eq!(bounty["issuer"], json!(editor.to_string()));

    // Second issuance conflicts; the link is one-way.
    let response = server
        .post(&format!("/api/v1/proposals/{proposal_id}/issue-bounty"))
        .add_header(editor_h, editor_v)
        .json(&json!({"reward_cents": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let claimed: Value = server
        .post(&format!("/api/v1/bounties/{bounty_id}/claim"))
        .add_header(claimer_h, claimer_v)
        .await
        .json();
    assert_eq!(claimed["claimer"], json!(claimer.to_string()));
    assert!(claimed.get("date_completed").is_some());

    // Second claim conflicts.
    let late = Uuid::new_v4();
    let (late_h, late_v) = user_header(late);
    let response = server
        .post(&format!("/api/v1/bounties/{bounty_id}/claim"))
        .add_header(late_h, late_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // The claim landed on the ledger.
    let ledger: Value = server
        .get(&format!("/api/v1/contributions?kind=topic&id={topic_id}"))
        .await
        .json();
    assert_eq!(ledger.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_expired_bounty_claim_is_gone() {
    let server = create_test_server();
    let admin = Uuid::new_v4();
    let (admin_h, admin_v) = user_header(admin);

    let topic: Value = server
        .post("/api/v1/topics")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "Endocrinology"}))
        .await
        .json();
    let topic_id = topic["id"].as_str().unwrap().to_string();

    let bounty: Value = server
        .post("/api/v1/bounties")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({
            "target_kind": "topic",
            "target_id": topic_id,
            "reward_cents": 100,
            "date_expire": "2020-01-01T00:00:00Z"
        }))
        .await
        .json();
    let bounty_id = bounty["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/v1/bounties/{bounty_id}/claim"))
        .add_header(admin_h, admin_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::GONE);
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let server = create_test_server();
    let user = Uuid::new_v4();
    let (user_h, user_v) = user_header(user);

    let profile: Value = server
        .put("/api/v1/profiles/me")
        .add_header(user_h.clone(), user_v.clone())
        .json(&json!({"degrees": "MD", "job_title": "Endocrinologist"}))
        .await
        .json();
    assert_eq!(profile["degrees"], "MD");

    let fetched: Value = server.get(&format!("/api/v1/profiles/{user}")).await.json();
    assert_eq!(fetched["job_title"], "Endocrinologist");

    // Befriending yourself is rejected.
    let response = server
        .post(&format!("/api/v1/profiles/me/friends/{user}"))
        .add_header(user_h, user_v)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_group_name_conflicts() {
    let server = create_test_server();
    let admin = Uuid::new_v4();
    let (admin_h, admin_v) = user_header(admin);

    let response = server
        .post("/api/v1/groups")
        .add_header(admin_h.clone(), admin_v.clone())
        .json(&json!({"name": "editors"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/api/v1/groups")
        .add_header(admin_h, admin_v)
        .json(&json!({"name": "editors"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}
