//! API endpoint integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

mod common;
use common::{build_test_router, setup_state, setup_state_with_capacity};

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_router(setup_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_reports_checks() {
    let app = build_test_router(setup_state());

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["sessions"]["status"], "ok");
    // No server-level keys configured in tests
    assert_eq!(json["checks"]["stt"]["status"], "unavailable");
    assert_eq!(json["checks"]["tts"]["status"], "unavailable");
}

#[tokio::test]
async fn test_create_session() {
    let state = setup_state();
    let app = build_test_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let session_id = json["session_id"].as_str().unwrap();
    assert!(!session_id.is_empty());
    assert_eq!(json["persona"], "default");
    assert!(json["greeting"].is_string());

    // The session is live in the registry
    assert!(state.registry.get(session_id).await.is_some());
}

#[tokio::test]
async fn test_create_session_rejected_at_capacity() {
    let app = build_test_router(setup_state_with_capacity(1));

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(
            Request::builder()
                .uri("/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(second).await;
    assert_eq!(json["error"]["code"], "session_limit");
}

#[tokio::test]
async fn test_submit_api_keys_and_status() {
    let state = setup_state();
    let app = build_test_router(state);

    let created = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let session_id = json_body(created).await["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/session/{session_id}/api-keys"))
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"gemini": "g-key", "openweather": "w-key", "tavily": ""}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let configured: Vec<&str> = json["configured_keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    // Empty strings are ignored
    assert_eq!(configured, vec!["gemini", "openweather"]);

    let status = app
        .oneshot(
            Request::builder()
                .uri(format!("/session/{session_id}/status"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(status.status(), StatusCode::OK);
    let json = json_body(status).await;
    assert_eq!(json["message_count"], 0);
    assert_eq!(json["available_features"]["ai_chat"], true);
    assert_eq!(json["available_features"]["weather"], true);
    assert_eq!(json["available_features"]["web_search"], false);
    assert_eq!(json["available_features"]["transcription"], false);
}

#[tokio::test]
async fn test_unknown_session_returns_not_found() {
    let app = build_test_router(setup_state());

    let status = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/no-such-id/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(status.status(), StatusCode::NOT_FOUND);

    let keys = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/no-such-id/api-keys")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"gemini": "g-key"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(keys.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_voice_endpoints_unconfigured() {
    let app = build_test_router(setup_state());

    let capabilities = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/voice/capabilities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(capabilities.status(), StatusCode::OK);
    let json = json_body(capabilities).await;
    assert_eq!(json["stt_available"], false);
    assert_eq!(json["tts_available"], false);

    // Without keys, transcribe/synthesize degrade to a clear 503
    let transcribe = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/voice/transcribe")
                .body(Body::from(vec![0u8; 16]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(transcribe.status(), StatusCode::SERVICE_UNAVAILABLE);

    let synthesize = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/voice/synthesize")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text": "hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(synthesize.status(), StatusCode::SERVICE_UNAVAILABLE);
}
