/// Reelpro API server library.
///
/// REST surface for the ReelDownloader Pro dashboard: mock login, single
/// reel downloads, the premium bulk queue, transcript generation, and
/// artifact serving. Exported as a library so the router can be driven
/// directly in tests.
pub mod auth;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use reelpro_engine::TaskRunner;
use reelpro_shared::policy::TierPolicy;
use reelpro_shared::session::SessionStore;

/// Shared application state for all API handlers.
pub struct AppState {
    pub sessions: SessionStore,
    pub policy: TierPolicy,
    pub runner: TaskRunner,
    pub jwt_secret: String,
    pub session_ttl: i64,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth routes
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", delete(routes::logout))
        .route("/api/session", get(routes::session_info))
        // Download routes
        .route("/api/download", post(routes::download_reel))
        .route("/api/artifacts/:name", get(routes::download_artifact))
        // Premium routes
        .route("/api/queue", post(routes::enqueue_urls))
        .route("/api/queue", get(routes::list_queue))
        .route("/api/queue/process", post(routes::process_queue))
        .route("/api/transcript", post(routes::generate_transcript))
        .layer(cors)
        .with_state(state)
}
