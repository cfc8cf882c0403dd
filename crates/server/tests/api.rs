use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, router};

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, auth: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((username, password)) = auth {
        builder = builder.header(header::AUTHORIZATION, basic_auth(username, password));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, username: &str, role: &str) {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/users/register",
            None,
            Some(json!({ "username": username, "password": "password", "role": role })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn trip_payload() -> Value {
    json!({
        "title": "Summer",
        "destination": "Lisbon",
        "start_date": "2026-07-01",
        "end_date": "2026-07-10",
        "budget_cents": 100_000,
        "notes": null,
        "location_ids": null
    })
}

async fn create_trip(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/trips",
            Some((username, "password")),
            Some(trip_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let app = test_router().await;

    let anonymous = app
        .clone()
        .oneshot(request("GET", "/trips", None, None))
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let wrong_password = app
        .clone()
        .oneshot(request("GET", "/trips", Some(("ghost", "nope")), None))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_is_open_and_conflicts_on_duplicates() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;

    let duplicate = app
        .clone()
        .oneshot(request(
            "POST",
            "/users/register",
            None,
            Some(json!({ "username": "alice", "password": "other", "role": null })),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn visitor_reads_trips_but_cannot_create_them() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;
    register(&app, "vera", "visitor").await;
    create_trip(&app, "alice").await;

    let listing = app
        .clone()
        .oneshot(request("GET", "/trips", Some(("vera", "password")), None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(json_body(listing).await["trips"].as_array().unwrap().len(), 1);

    let denied = app
        .clone()
        .oneshot(request(
            "POST",
            "/trips",
            Some(("vera", "password")),
            Some(trip_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn visitor_has_no_expense_surface() {
    let app = test_router().await;
    register(&app, "vera", "visitor").await;

    let listing = app
        .clone()
        .oneshot(request("GET", "/expenses", Some(("vera", "password")), None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn summary_route_reflects_expense_writes() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;
    let trip_id = create_trip(&app, "alice").await;

    // Before any expense write, the summary is well formed and zeroed.
    let empty = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/trips/{trip_id}/summary"),
            Some(("alice", "password")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::OK);
    let body = json_body(empty).await;
    assert_eq!(body["total_cents"], json!(0));
    assert_eq!(body["generated_at"], Value::Null);
    assert_eq!(body["category_breakdown"]["food"], json!(0));

    for (category, cents) in [("food", 1000), ("food", 500), ("transport", 2000)] {
        let created = app
            .clone()
            .oneshot(request(
                "POST",
                "/expenses",
                Some(("alice", "password")),
                Some(json!({
                    "trip_id": trip_id,
                    "category": category,
                    "amount_cents": cents,
                    "description": null,
                    "date": "2026-07-02"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
    }

    let summary = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/trips/{trip_id}/summary"),
            Some(("alice", "password")),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(summary).await;
    assert_eq!(body["total_cents"], json!(3500));
    assert_eq!(body["category_breakdown"]["food"], json!(1500));
    assert_eq!(body["category_breakdown"]["transport"], json!(2000));
    assert_eq!(body["category_breakdown"]["accommodation"], json!(0));
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn invalid_trip_dates_are_unprocessable() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/trips",
            Some(("alice", "password")),
            Some(json!({
                "title": "Backwards",
                "destination": "Lisbon",
                "start_date": "2026-07-10",
                "end_date": "2026-07-01",
                "budget_cents": 1000,
                "notes": null,
                "location_ids": null
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_trip_is_not_found() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/trips/00000000-0000-0000-0000-000000000000",
            Some(("alice", "password")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn guide_cannot_mutate_a_foreign_trip() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;
    register(&app, "bob", "guide").await;
    let trip_id = create_trip(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/trips/{trip_id}"),
            Some(("bob", "password")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_deletes_users_and_their_data() {
    let app = test_router().await;
    register(&app, "alice", "guide").await;
    register(&app, "root", "admin").await;
    create_trip(&app, "alice").await;

    let forbidden = app
        .clone()
        .oneshot(request(
            "DELETE",
            "/users/alice",
            Some(("alice", "password")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = app
        .clone()
        .oneshot(request(
            "DELETE",
            "/users/alice",
            Some(("root", "password")),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let listing = app
        .clone()
        .oneshot(request("GET", "/trips", Some(("root", "password")), None))
        .await
        .unwrap();
    assert!(json_body(listing).await["trips"].as_array().unwrap().is_empty());
}
