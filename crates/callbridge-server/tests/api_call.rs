mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use callbridge_server::api::CallResponse;
use callbridge_server::app;
use common::{state, Mode, StubControlPlane};
use serde_json::Value;
use tower::ServiceExt;

async fn post_call(router: Router, body: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/call")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn api_health_returns_status_only() {
    let router = app(state(StubControlPlane::new(Mode::Answer), Some("ST_x")));
    let (status, json) = get_json(router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn health_reports_version() {
    let router = app(state(StubControlPlane::new(Mode::Answer), None));
    let (status, json) = get_json(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn successful_call_returns_room_name() {
    let control_plane = StubControlPlane::new(Mode::Answer);
    let router = app(state(control_plane.clone(), Some("ST_x")));

    let (status, json) = post_call(router, r#"{"phone_number": "+15551234567"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let response: CallResponse = serde_json::from_value(json).unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Call to +15551234567 initiated successfully");

    let room_name = response.room_name.expect("room name");
    assert!(room_name.starts_with("outbound-"));

    let dials = control_plane.dials();
    assert_eq!(dials.len(), 1);
    assert_eq!(dials[0].room_name, room_name);
    assert_eq!(dials[0].sip_call_to, "+15551234567");
    assert!(dials[0].wait_until_answered);

    let dispatches = control_plane.dispatches();
    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0].room, room_name);
}

#[tokio::test]
async fn wait_for_answer_false_is_forwarded() {
    let control_plane = StubControlPlane::new(Mode::Answer);
    let router = app(state(control_plane.clone(), Some("ST_x")));

    let (status, _) = post_call(
        router,
        r#"{"phone_number": "+15551234567", "wait_for_answer": false}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!control_plane.dials()[0].wait_until_answered);
}

#[tokio::test]
async fn number_without_plus_is_rejected_before_dialing() {
    let control_plane = StubControlPlane::new(Mode::Answer);
    let router = app(state(control_plane.clone(), Some("ST_x")));

    let (status, json) = post_call(router, r#"{"phone_number": "15551234567"}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("must start with '+'"));
    assert!(control_plane.dials().is_empty());
    assert!(control_plane.dispatches().is_empty());
}

#[tokio::test]
async fn missing_phone_number_is_a_validation_error() {
    let control_plane = StubControlPlane::new(Mode::Answer);
    let router = app(state(control_plane.clone(), Some("ST_x")));

    let (status, json) = post_call(router, r#"{"wait_for_answer": true}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string());
    assert!(control_plane.dials().is_empty());
}

#[tokio::test]
async fn missing_trunk_returns_server_error() {
    let control_plane = StubControlPlane::new(Mode::Answer);
    let router = app(state(control_plane.clone(), None));

    let (status, json) = post_call(router, r#"{"phone_number": "+15551234567"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Failed to initiate call to +15551234567");
    assert!(control_plane.dials().is_empty());
}

#[tokio::test]
async fn rejected_dial_returns_server_error_without_dispatch() {
    let control_plane = StubControlPlane::new(Mode::Reject);
    let router = app(state(control_plane.clone(), Some("ST_x")));

    let (status, json) = post_call(router, r#"{"phone_number": "+15551234567"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["detail"], "Failed to initiate call to +15551234567");
    assert_eq!(control_plane.dials().len(), 1);
    assert!(control_plane.dispatches().is_empty());
}

#[tokio::test]
async fn control_plane_error_is_reported_in_detail() {
    let control_plane = StubControlPlane::new(Mode::Unreachable);
    let router = app(state(control_plane, Some("ST_x")));

    let (status, json) = post_call(router, r#"{"phone_number": "+15551234567"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error: "));
    assert!(detail.contains("livekit unreachable"));
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let router = app(state(StubControlPlane::new(Mode::Answer), Some("ST_x")));

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/call")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
