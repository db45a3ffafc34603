//! HTTP surface tests: health, room inspection, static files.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{Client, app, spawn_server};

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
        panic!("valid request");
    };
    let Ok(response) = router.oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("readable body");
    };
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_counters() {
    let addr = spawn_server().await;
    let mut client = Client::connect(addr).await;
    let _lurker = Client::connect(addr).await;
    client.emit("joinRoom", json!({ "roomId": "trip-A" })).await;
    let _ = client.recv().await;

    let response = reqwest::get(format!("http://{addr}/health")).await;
    let response = tokio_test::assert_ok!(response);
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = tokio_test::assert_ok!(response.json().await);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connections"], 2);
    assert_eq!(body["joined"], 1);
    assert_eq!(body["rooms"], 1);
}

#[tokio::test]
async fn rooms_list_is_empty_initially() {
    let (status, body) = get_json(app(), "/api/v1/rooms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "rooms": [], "total": 0 }));
}

#[tokio::test]
async fn unknown_room_is_404_with_error_body() {
    let (status, body) = get_json(app(), "/api/v1/rooms/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn room_detail_lists_members_over_live_server() {
    let addr = spawn_server().await;
    let mut raj = Client::connect(addr).await;
    raj.emit("joinRoom", json!({ "roomId": "trip-A", "username": "Raj" }))
        .await;
    let _ = raj.recv().await;
    raj.emit("updateLocation", json!({ "lat": 17.38, "lng": 78.48 }))
        .await;
    let _ = raj.recv().await;

    let response = reqwest::get(format!("http://{addr}/api/v1/rooms/trip-A")).await;
    let response = tokio_test::assert_ok!(response);
    let body: Value = tokio_test::assert_ok!(response.json().await);
    assert_eq!(body["roomId"], "trip-A");
    assert_eq!(body["members"][0]["socketId"], raj.id.as_str());
    assert_eq!(body["members"][0]["username"], "Raj");
    assert_eq!(body["members"][0]["lat"], 17.38);
    assert_eq!(body["members"][0]["lng"], 78.48);
    assert!(body["members"][0]["joinedAt"].is_string());
    assert!(body.get("room_id").is_none());

    let rooms: Value = tokio_test::assert_ok!(
        tokio_test::assert_ok!(reqwest::get(format!("http://{addr}/api/v1/rooms")).await)
            .json()
            .await
    );
    assert_eq!(
        rooms,
        json!({ "rooms": [{ "roomId": "trip-A", "members": 1, "located": 1 }], "total": 1 })
    );
}

#[tokio::test]
async fn root_serves_static_index() {
    let Ok(request) = Request::builder().uri("/").body(Body::empty()) else {
        panic!("valid request");
    };
    let Ok(response) = app().oneshot(request).await else {
        panic!("router is infallible");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("readable body");
    };
    assert!(String::from_utf8_lossy(&bytes).contains("waypoint-relay"));
}
