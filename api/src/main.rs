/// Reelpro API Server
///
/// REST API for the ReelDownloader Pro dashboard. Every pipeline behind it
/// is simulated: login accepts any non-empty credentials, downloads and
/// transcripts write placeholder files after a fixed pause.
use std::sync::Arc;

use tracing::info;

use reelpro_api::{build_router, AppState};
use reelpro_engine::TaskRunner;
use reelpro_shared::latency::Pacer;
use reelpro_shared::policy::TierPolicy;
use reelpro_shared::session::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelpro_api=info,tower_http=info".into()),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let session_ttl: i64 = std::env::var("SESSION_TTL_SECS")
        .unwrap_or_else(|_| "3600".to_string())
        .parse()
        .unwrap_or(3600);
    let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let api_port: u16 = std::env::var("API_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let cleanup_interval: u64 = std::env::var("SESSION_CLEANUP_INTERVAL")
        .unwrap_or_else(|_| "300".to_string())
        .parse()
        .unwrap_or(300);
    let download_dir = std::env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "./artifacts".to_string());

    // Artifact directory
    std::fs::create_dir_all(&download_dir)?;
    info!("Artifact directory: {}", download_dir);

    // App state
    let sessions = SessionStore::new(session_ttl);
    let state = Arc::new(AppState {
        sessions: sessions.clone(),
        policy: TierPolicy::from_env(),
        runner: TaskRunner::new(&download_dir, Pacer::from_env()),
        jwt_secret,
        session_ttl,
    });

    // Background session cleanup
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(cleanup_interval));
        loop {
            interval.tick().await;
            let n = sessions.cleanup_expired().await;
            if n > 0 {
                info!("Cleaned up {} expired sessions", n);
            }
        }
    });

    // Router
    let app = build_router(state);

    // Bind
    let addr = format!("{}:{}", api_host, api_port);
    info!("Reelpro API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
