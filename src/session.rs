use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

pub fn create_session_token(
    user_id: &str,
    email: &str,
    name: &str,
    ttl_seconds: u64,
    secret: &str,
) -> Result<String, AppError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        exp: (now_unix() + ttl_seconds) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| AppError::Internal(format!("Failed to sign session token: {}", err)))
}

pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))?;
    Ok(token_data.claims)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?;
    let raw = value.to_str().ok()?;
    raw.strip_prefix("Bearer ").map(|token| token.trim().to_string())
}

/// Resolves the signed-in user from the `Authorization: Bearer` header.
pub fn require_session(state: &AppState, headers: &HeaderMap) -> Result<SessionClaims, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Missing session bearer token".to_string()))?;
    verify_session_token(&token, &state.config().jwt_secret)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
