//! End-to-end tests driving the Reelpro router directly.
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reelpro_api::{build_router, AppState};
use reelpro_engine::TaskRunner;
use reelpro_shared::latency::Pacer;
use reelpro_shared::policy::TierPolicy;
use reelpro_shared::session::SessionStore;

/// Router plus the tempdir backing the artifact directory; the dir must
/// outlive the requests.
fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState {
        sessions: SessionStore::new(3600),
        policy: TierPolicy::default(),
        runner: TaskRunner::new(dir.path(), Pacer::disabled()),
        jwt_secret: "test-secret".to_string(),
        session_ttl: 3600,
    });
    (build_router(state), dir)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_assigns_standard_tier() {
    let (app, _dir) = test_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "standard");
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn login_reserved_address_is_premium_case_insensitively() {
    let (app, _dir) = test_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "Premium@Example.com", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "premium");
}

#[tokio::test]
async fn login_with_empty_password_fails_closed() {
    let (app, _dir) = test_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");
}

#[tokio::test]
async fn download_requires_a_token() {
    let (app, _dir) = test_app();
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/download",
        None,
        Some(json!({ "url": "https://www.instagram.com/reel/Cxyz123/" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn download_writes_and_serves_the_artifact() {
    let (app, _dir) = test_app();
    let token = login(&app, "ana@example.com", "pw").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/download",
        Some(&token),
        Some(json!({ "url": "https://www.instagram.com/reel/Cxyz123/", "captions": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reel downloaded: reel_Cxyz123.mp4");
    assert_eq!(body["video_file"], "reel_Cxyz123.mp4");
    assert_eq!(body["caption_file"], "reel_Cxyz123_caption.txt");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/artifacts/reel_Cxyz123.mp4")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "video/mp4"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "Mock video.");
}

#[tokio::test]
async fn download_rejects_an_invalid_url() {
    let (app, _dir) = test_app();
    let token = login(&app, "ana@example.com", "pw").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/download",
        Some(&token),
        Some(json!({ "url": "not-a-valid-url" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Instagram Reel URL.");
}

#[tokio::test]
async fn download_rejects_an_empty_url() {
    let (app, _dir) = test_app();
    let token = login(&app, "ana@example.com", "pw").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/download",
        Some(&token),
        Some(json!({ "url": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a Reel URL.");
}

#[tokio::test]
async fn queue_routes_are_premium_only() {
    let (app, _dir) = test_app();
    let token = login(&app, "ana@example.com", "pw").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/queue",
        Some(&token),
        Some(json!({ "urls": "https://www.instagram.com/reel/AAA/" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&app, "POST", "/api/queue/process", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn queue_add_and_process_flow() {
    let (app, _dir) = test_app();
    let token = login(&app, "premium@example.com", "pw").await;

    let block = "https://www.instagram.com/reel/AAA/\n  https://www.instagram.com/reel/BBB/  \n\n";
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/queue",
        Some(&token),
        Some(json!({ "urls": block })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"], 2);
    assert_eq!(body["message"], "2 URLs added.");

    let (status, body) = send_json(&app, "GET", "/api/queue", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send_json(&app, "POST", "/api/queue/process", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 2);
    assert_eq!(body["message"], "Bulk download queue processed.");

    // Draining an already-empty queue is a no-op.
    let (status, body) = send_json(&app, "POST", "/api/queue/process", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 0);
}

#[tokio::test]
async fn queue_rejects_a_blank_block() {
    let (app, _dir) = test_app();
    let token = login(&app, "premium@example.com", "pw").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/queue",
        Some(&token),
        Some(json!({ "urls": "   \n  \n" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter at least one URL.");
}

#[tokio::test]
async fn transcript_upload_generates_the_placeholder() {
    let (app, dir) = test_app();
    let token = login(&app, "premium@example.com", "pw").await;

    let boundary = "reelpro-test-boundary";
    let multipart_body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"reel_Cxyz123.mp4\"\r\nContent-Type: video/mp4\r\n\r\nMock video.\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transcript")
                .header("authorization", format!("Bearer {}", token))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(multipart_body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["transcript_file"], "reel_Cxyz123_transcript.txt");
    assert_eq!(body["message"], "Transcript: reel_Cxyz123_transcript.txt");

    let content =
        std::fs::read_to_string(dir.path().join("reel_Cxyz123_transcript.txt")).unwrap();
    assert_eq!(content, "Mock transcript.");
}

#[tokio::test]
async fn logout_revokes_the_token_and_drops_the_queue() {
    let (app, _dir) = test_app();
    let token = login(&app, "premium@example.com", "pw").await;

    send_json(
        &app,
        "POST",
        "/api/queue",
        Some(&token),
        Some(json!({ "urls": "https://www.instagram.com/reel/AAA/" })),
    )
    .await;

    let (status, _) = send_json(&app, "DELETE", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Same JWT no longer resolves to a session.
    let (status, _) = send_json(&app, "GET", "/api/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn path_traversal_in_artifact_names_is_rejected() {
    let (app, _dir) = test_app();
    let token = login(&app, "ana@example.com", "pw").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/artifacts/..%2Fsecret.txt")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_info_reports_tier_and_queue_depth() {
    let (app, _dir) = test_app();
    let token = login(&app, "premium@example.com", "pw").await;

    send_json(
        &app,
        "POST",
        "/api/queue",
        Some(&token),
        Some(json!({ "urls": "https://www.instagram.com/reel/AAA/" })),
    )
    .await;

    let (status, body) = send_json(&app, "GET", "/api/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "premium@example.com");
    assert_eq!(body["display_name"], "premium");
    assert_eq!(body["tier"], "premium");
    assert_eq!(body["queued"], 1);
}
