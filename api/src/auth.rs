/// JWT management and auth extraction for the API.
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use reelpro_shared::models::Tier;

use crate::AppState;

/// JWT Claims payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: session id
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated session info attached to a request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: String,
    pub email: String,
    pub tier: Tier,
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Create a JWT whose subject is the session id.
pub fn create_jwt(session_id: &str, secret: &str, ttl_secs: i64) -> Result<String, String> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_secs);

    let claims = Claims {
        sub: session_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode error: {}", e))
}

/// Validate a JWT token and return the claims.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| format!("JWT validation error: {}", e))?;

    Ok(token_data.claims)
}

/// Extract the token from request headers (Authorization header or cookie).
fn extract_token(headers: &HeaderMap) -> Option<String> {
    // Try Authorization: Bearer <token>
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    // Fallback: try cookie "reelpro_token"
    if let Some(cookies) = headers.get("cookie").and_then(|v| v.to_str().ok()) {
        for cookie in cookies.split(';').map(|c| c.trim()) {
            if let Some(token) = cookie.strip_prefix("reelpro_token=") {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Authenticate a request. The JWT is checked first, then the session
/// registry, so a logged-out session is rejected even with a valid token.
pub async fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthSession, (StatusCode, Json<ErrorBody>)> {
    let token = extract_token(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "No authentication token provided".to_string(),
            }),
        )
    })?;

    let claims = validate_jwt(&token, &state.jwt_secret).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody { error: e }),
        )
    })?;

    let session = state.sessions.get(&claims.sub).await.ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "Session expired or invalid".to_string(),
            }),
        )
    })?;

    Ok(AuthSession {
        session_id: session.id,
        email: session.email,
        tier: session.tier,
    })
}

/// Authenticate and require a premium session. Bulk queueing and transcript
/// generation are gated behind this.
pub async fn require_premium(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthSession, (StatusCode, Json<ErrorBody>)> {
    let session = authenticate(headers, state).await?;

    if !session.tier.is_premium() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                error: "Premium subscription required".to_string(),
            }),
        ));
    }

    Ok(session)
}
