use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Days;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    session::{create_session_token, require_session},
    state::{AppState, OAuthProvider},
};

pub const DEMO_USER_ID: &str = "demo";
const DEMO_DISPLAY_NAME: &str = "Demo Runner";
const DEMO_GOAL_TIME: &str = "3:30:00";
const DEMO_PLAN_OFFSET_DAYS: u64 = 14;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/google", get(google_auth))
        .route("/api/auth/google/callback", get(google_callback))
        .route("/api/auth/demo", post(demo_login))
        .route("/api/auth/me", get(me))
}

#[derive(Debug, Serialize)]
struct AuthUrlResponse {
    auth_url: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct OAuthCallbackQuery {
    code: String,
    state: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    token: String,
    user_id: String,
    display_name: String,
    expires_in_seconds: u64,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    user_id: String,
    email: String,
    display_name: String,
}

async fn google_auth(State(state): State<AppState>) -> Result<Json<AuthUrlResponse>, AppError> {
    let oauth_state = Uuid::new_v4().to_string();
    let auth_url = state
        .google()
        .authorize_url(&state.config().google_redirect_uri, &oauth_state)?;
    state.store_oauth_state(oauth_state.clone(), OAuthProvider::Google, None);

    Ok(Json(AuthUrlResponse {
        auth_url,
        state: oauth_state,
    }))
}

async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<SessionResponse>, AppError> {
    state
        .take_oauth_state(&query.state, OAuthProvider::Google)
        .ok_or_else(|| AppError::Unauthorized("Invalid OAuth state".to_string()))?;

    let google = state.google();
    let access_token = google
        .exchange_code(&query.code, &state.config().google_redirect_uri)
        .await?;
    let profile = google.profile(&access_token).await?;

    let user_id = format!("google:{}", profile.sub);
    let mut settings = state.settings().get(&user_id)?.unwrap_or_default();
    if settings.display_name.trim().is_empty() {
        settings.display_name = profile.display_name();
    }
    settings.email = profile.email.clone();
    settings.google_connected = true;
    state.settings().put(&user_id, &settings)?;

    tracing::info!(user_id = %user_id, "Google sign-in complete");
    issue_session(&state, user_id, &settings.email, &settings.display_name).map(Json)
}

async fn demo_login(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    if !state.config().allow_demo {
        return Err(AppError::NotFound("Demo mode is disabled".to_string()));
    }

    let mut settings = state.settings().get(DEMO_USER_ID)?.unwrap_or_default();
    if !settings.demo {
        settings.demo = true;
        settings.display_name = DEMO_DISPLAY_NAME.to_string();
        settings.goal_time = Some(DEMO_GOAL_TIME.to_string());
        settings.start_date = state
            .today()
            .checked_sub_days(Days::new(DEMO_PLAN_OFFSET_DAYS))
            .map(|date| date.format("%Y-%m-%d").to_string());
        state.settings().put(DEMO_USER_ID, &settings)?;
    }

    issue_session(&state, DEMO_USER_ID.to_string(), "", &settings.display_name).map(Json)
}

async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, AppError> {
    let session = require_session(&state, &headers)?;
    Ok(Json(MeResponse {
        user_id: session.sub,
        email: session.email,
        display_name: session.name,
    }))
}

fn issue_session(
    state: &AppState,
    user_id: String,
    email: &str,
    display_name: &str,
) -> Result<SessionResponse, AppError> {
    let ttl = state.config().session_ttl.as_secs();
    let token = create_session_token(&user_id, email, display_name, ttl, &state.config().jwt_secret)?;
    Ok(SessionResponse {
        token,
        user_id,
        display_name: display_name.to_string(),
        expires_in_seconds: ttl,
    })
}
