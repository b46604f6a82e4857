/// API route handlers for the Reelpro dashboard.
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use reelpro_shared::models::{DownloadRequest, Tier};

use crate::auth;
use crate::AppState;

// ====== REQUEST / RESPONSE TYPES ======

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub tier: Tier,
    pub expires_in: i64,
}

#[derive(Deserialize)]
pub struct DownloadBody {
    pub url: String,
    #[serde(default)]
    pub watermark_text: Option<String>,
    #[serde(default)]
    pub captions: bool,
}

#[derive(Deserialize)]
pub struct QueueBody {
    /// Newline-separated block of reel URLs.
    pub urls: String,
}

// ====== AUTH ROUTES ======

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    let tier = state
        .policy
        .authenticate(&body.email, &body.password)
        .map_err(|e| {
            (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse {
                    message: e.to_string(),
                }),
            )
        })?;

    let session = state.sessions.create(&body.email, tier).await;

    let token = auth::create_jwt(&session.id, &state.jwt_secret, state.session_ttl).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse {
                message: format!("Failed to create session: {}", e),
            }),
        )
    })?;

    info!("User {} logged in ({})", session.email, tier);

    // Set cookie header
    let cookie = format!(
        "reelpro_token={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        token, state.session_ttl
    );

    let mut headers = HeaderMap::new();
    headers.insert("Set-Cookie", cookie.parse().unwrap());

    Ok((
        headers,
        Json(AuthResponse {
            token,
            email: session.email,
            tier,
            expires_in: state.session_ttl,
        }),
    ))
}

/// DELETE /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session = auth::authenticate(&headers, &state).await;

    if let Ok(s) = &session {
        state.sessions.logout(&s.session_id).await;
        info!("User {} logged out", s.email);
    }

    // Clear cookie
    let mut resp_headers = HeaderMap::new();
    resp_headers.insert(
        "Set-Cookie",
        "reelpro_token=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0"
            .parse()
            .unwrap(),
    );

    (
        resp_headers,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// GET /api/session
pub async fn session_info(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::authenticate(&headers, &state).await?;

    let session = state.sessions.get(&session.session_id).await.ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(auth::ErrorBody {
                error: "Session expired or invalid".to_string(),
            }),
        )
    })?;

    let display_name = session.display_name().to_string();
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "email": session.email,
            "display_name": display_name,
            "tier": session.tier,
            "queued": session.pending_urls.len(),
        })),
    ))
}

// ====== DOWNLOAD ROUTES ======

/// POST /api/download - Run a single simulated reel download to completion
pub async fn download_reel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<DownloadBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::authenticate(&headers, &state).await?;

    let url = body.url.trim().to_string();
    if url.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Please enter a Reel URL." })),
        ));
    }

    let request = DownloadRequest {
        url,
        watermark_text: body.watermark_text.filter(|t| !t.trim().is_empty()),
        captions: body.captions,
    };

    match state.runner.download_reel(&request).await {
        Ok(result) => {
            info!(
                "Download complete: user={} file={}",
                session.email, result.video_file
            );
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": result.message,
                    "video_file": result.video_file,
                    "caption_file": result.caption_file,
                })),
            ))
        }
        Err(e) if e.is_user_error() => {
            warn!("Download rejected: user={} url={}", session.email, request.url);
            Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            ))
        }
        Err(e) => {
            warn!("Download failed: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("{}", e) })),
            ))
        }
    }
}

/// GET /api/artifacts/:name - Serve a placeholder artifact back to the user
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<auth::ErrorBody>)> {
    let _session = auth::authenticate(&headers, &state).await?;

    // Artifact names are flat; anything path-like is rejected.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(auth::ErrorBody {
                error: "Invalid artifact name".into(),
            }),
        ));
    }

    let path = state.runner.workdir().join(&name);
    if !path.exists() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(auth::ErrorBody {
                error: "Artifact not found".into(),
            }),
        ));
    }

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(auth::ErrorBody {
                error: format!("Cannot open artifact: {}", e),
            }),
        )
    })?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let content_type = if name.ends_with(".mp4") {
        "video/mp4"
    } else if name.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    };

    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "_"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

// ====== PREMIUM ROUTES ======

/// POST /api/queue - Append a newline-separated block of URLs to the queue
pub async fn enqueue_urls(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<QueueBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::require_premium(&headers, &state).await?;

    let added = match state.sessions.enqueue_urls(&session.session_id, &body.urls).await {
        Some(n) => n,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(auth::ErrorBody {
                    error: "Session expired or invalid".into(),
                }),
            ));
        }
    };

    if added == 0 {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Please enter at least one URL." })),
        ));
    }

    info!("Queued {} URLs for {}", added, session.email);
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": format!("{} URLs added.", added),
            "added": added,
        })),
    ))
}

/// GET /api/queue - Snapshot of the pending queue
pub async fn list_queue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::require_premium(&headers, &state).await?;

    let queue = state
        .sessions
        .pending_urls(&session.session_id)
        .await
        .unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "count": queue.len(),
            "queue": queue,
        })),
    ))
}

/// POST /api/queue/process - Drain the queue through the simulated pipeline
pub async fn process_queue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::require_premium(&headers, &state).await?;

    let urls = state
        .sessions
        .drain_queue(&session.session_id)
        .await
        .unwrap_or_default();

    let report = state.runner.process_queue(urls).await;
    info!("Queue drained: user={} processed={}", session.email, report.processed);

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Bulk download queue processed.",
            "processed": report.processed,
        })),
    ))
}

/// POST /api/transcript - Upload a downloaded reel and generate a transcript
pub async fn generate_transcript(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, Json<auth::ErrorBody>)> {
    let session = auth::require_premium(&headers, &state).await?;

    let mut video_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(auth::ErrorBody {
                error: format!("Invalid upload: {}", e),
            }),
        )
    })? {
        if field.name() != Some("video") {
            continue;
        }

        // Strip any client-side path components from the upload name.
        let name = field
            .file_name()
            .map(|n| n.to_string())
            .and_then(|n| {
                std::path::Path::new(&n)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| "upload.mp4".to_string());

        if !name.ends_with(".mp4") {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Only .mp4 uploads are supported" })),
            ));
        }

        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(auth::ErrorBody {
                    error: format!("Invalid upload: {}", e),
                }),
            )
        })?;

        tokio::fs::write(state.runner.workdir().join(&name), &data)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(auth::ErrorBody {
                        error: format!("Failed to store upload: {}", e),
                    }),
                )
            })?;

        video_name = Some(name);
        break;
    }

    let video_name = match video_name {
        Some(n) => n,
        None => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "No video file uploaded" })),
            ));
        }
    };

    match state.runner.generate_transcript(&video_name).await {
        Ok(result) => {
            info!(
                "Transcript complete: user={} file={}",
                session.email, result.transcript_file
            );
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": result.message,
                    "transcript_file": result.transcript_file,
                })),
            ))
        }
        Err(e) => {
            warn!("Transcript failed: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("{}", e) })),
            ))
        }
    }
}
