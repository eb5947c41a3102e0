#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end scenarios S1-S6 (`spec.md` §8), driving the real axum router
//! with an in-memory sea-orm/SQLite store and the `DummyProvisioner`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dyndns_auth::TokenCodec;
use dyndns_core::api::rest::{build_router, AppState};
use dyndns_core::domain::engine::AliasEngine;
use dyndns_core::domain::models::DomainConfig;
use dyndns_core::domain::provisioner::Provisioner;
use dyndns_core::domain::registry::ProvisionerRegistry;
use dyndns_core::domain::storage::StorageBackend;
use dyndns_core::infra::storage::{Migrator, SeaOrmStorage};
use dyndns_core::test_support::{Call, DummyProvisioner};
use dyndns_db::DbManager;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use std::sync::Arc;
use time::Duration;
use tower::ServiceExt;

async fn test_app() -> (axum::Router, Arc<dyn StorageBackend>, Arc<DummyProvisioner>) {
    let mgr = DbManager::connect("sqlite", ":memory:").await.unwrap();
    mgr.migrate::<Migrator>().await.unwrap();
    let storage: Arc<dyn StorageBackend> = Arc::new(SeaOrmStorage::new(mgr.connection().clone()));

    let dummy = Arc::new(DummyProvisioner::new("dummy"));
    let provisioner: Arc<dyn Provisioner> = dummy.clone();
    let registry = ProvisionerRegistry::build(vec![(
        "dummy".to_string(),
        provisioner,
        vec![DomainConfig {
            host: None,
            apex: "bar.baz".to_string(),
        }],
    )])
    .unwrap();

    let tokens = TokenCodec::new(b"test-secret", Some(Duration::seconds(3600)));
    let engine = Arc::new(AliasEngine::new(storage.clone(), Arc::new(registry), tokens.clone()));
    let state = AppState {
        engine,
        tokens: Arc::new(tokens),
    };

    (build_router(state), storage, dummy)
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(router: &axum::Router, email: &str, password: &str) -> String {
    let response = router
        .clone()
        .oneshot(post(
            "/sessions",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn s1_fresh_user_has_no_aliases() {
    let (router, storage, _dummy) = test_app().await;
    let hash = dyndns_auth::hash("hunter2").unwrap();
    storage.create_user("alice@example.org", &hash).await.unwrap();

    let token = login(&router, "alice@example.org", "hunter2").await;

    let response = router
        .oneshot(get_auth("/aliases", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn s2_register_alias_calls_add_record_upstream() {
    let (router, storage, dummy) = test_app().await;
    let hash = dyndns_auth::hash("hunter2").unwrap();
    storage.create_user("alice@example.org", &hash).await.unwrap();
    let token = login(&router, "alice@example.org", "hunter2").await;

    let response = router
        .oneshot(post_auth(
            "/aliases",
            &token,
            json!({ "domain": "foo.bar.baz", "value": "127.0.0.1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        dummy.calls(),
        vec![Call::Add {
            host: "foo".to_string(),
            apex: "bar.baz".to_string(),
            value: "127.0.0.1".to_string(),
        }]
    );
}

#[tokio::test]
async fn s3_second_owner_gets_taken_same_owner_gets_already_exist() {
    let (router, storage, _dummy) = test_app().await;
    let alice_hash = dyndns_auth::hash("hunter2").unwrap();
    let bob_hash = dyndns_auth::hash("builder99").unwrap();
    storage
        .create_user("alice@example.org", &alice_hash)
        .await
        .unwrap();
    storage.create_user("bob@example.org", &bob_hash).await.unwrap();

    let alice_token = login(&router, "alice@example.org", "hunter2").await;
    let bob_token = login(&router, "bob@example.org", "builder99").await;

    let body = json!({ "domain": "foo.bar.baz", "value": "127.0.0.1" });
    let response = router
        .clone()
        .oneshot(post_auth("/aliases", &alice_token, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(post_auth("/aliases", &bob_token, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(post_auth("/aliases", &alice_token, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn s4_update_alias_changes_value_and_calls_upstream_once() {
    let (router, storage, dummy) = test_app().await;
    let hash = dyndns_auth::hash("hunter2").unwrap();
    storage.create_user("alice@example.org", &hash).await.unwrap();
    let token = login(&router, "alice@example.org", "hunter2").await;

    router
        .clone()
        .oneshot(post_auth(
            "/aliases",
            &token,
            json!({ "domain": "foo.bar.baz", "value": "127.0.0.1" }),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(put_auth(
            "/aliases",
            &token,
            json!({ "domain": "foo.bar.baz", "value": "8.8.8.8" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get_auth("/aliases", &token)).await.unwrap();
    let aliases = json_body(response).await;
    assert_eq!(aliases[0]["value"], "8.8.8.8");

    let update_calls: Vec<_> = dummy
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Update { .. }))
        .collect();
    assert_eq!(update_calls.len(), 1);
}

#[tokio::test]
async fn s5_delete_then_update_yields_not_found() {
    let (router, storage, dummy) = test_app().await;
    let hash = dyndns_auth::hash("hunter2").unwrap();
    storage.create_user("alice@example.org", &hash).await.unwrap();
    let token = login(&router, "alice@example.org", "hunter2").await;

    router
        .clone()
        .oneshot(post_auth(
            "/aliases",
            &token,
            json!({ "domain": "foo.bar.baz", "value": "127.0.0.1" }),
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(delete_auth("/aliases/foo.bar.baz", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let delete_calls: Vec<_> = dummy
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Delete { .. }))
        .collect();
    assert_eq!(delete_calls.len(), 1);

    let response = router
        .oneshot(put_auth(
            "/aliases",
            &token,
            json!({ "domain": "foo.bar.baz", "value": "8.8.8.8" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let (router, _storage, _dummy) = test_app().await;
    let response = router
        .oneshot(Request::builder()
            .method("GET")
            .uri("/aliases")
            .body(Body::empty())
            .unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
