use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, StravaError},
    pipeline::plan::parse_start_date,
    providers::strava::fetch_runs_for_user,
    session::require_session,
    state::{AppState, OAuthProvider},
    types::activity::ActivityRecord,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/strava/connect", post(strava_connect))
        .route("/api/strava/callback", get(strava_callback))
        .route("/api/strava/disconnect", post(strava_disconnect))
        .route("/api/strava/activities", get(list_runs))
}

#[derive(Debug, Serialize)]
struct StravaAuthResponse {
    auth_url: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct StravaCallbackQuery {
    code: String,
    state: String,
}

#[derive(Debug, Serialize)]
struct StravaStatusResponse {
    strava_connected: bool,
    athlete_id: Option<u64>,
}

async fn strava_connect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StravaAuthResponse>, AppError> {
    let session = require_session(&state, &headers)?;

    let oauth_state = Uuid::new_v4().to_string();
    let auth_url = state
        .strava()
        .authorize_url(&state.config().strava_redirect_uri, &oauth_state)?;
    state.store_oauth_state(oauth_state.clone(), OAuthProvider::Strava, Some(session.sub));

    Ok(Json(StravaAuthResponse {
        auth_url,
        state: oauth_state,
    }))
}

async fn strava_callback(
    State(state): State<AppState>,
    Query(query): Query<StravaCallbackQuery>,
) -> Result<Json<StravaStatusResponse>, AppError> {
    let user_id = state
        .take_oauth_state(&query.state, OAuthProvider::Strava)
        .and_then(|pending| pending.user_id)
        .ok_or_else(|| AppError::Unauthorized("Invalid OAuth state".to_string()))?;

    let tokens = state.strava().exchange_code(&query.code).await?;
    let athlete_id = tokens.athlete_id;

    let mut settings = state.settings().get(&user_id)?.unwrap_or_default();
    settings.strava_tokens = Some(tokens);
    settings.strava_connected = true;
    state.settings().put(&user_id, &settings)?;

    tracing::info!(user_id = %user_id, athlete_id = ?athlete_id, "Strava connected");
    Ok(Json(StravaStatusResponse {
        strava_connected: true,
        athlete_id,
    }))
}

async fn strava_disconnect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StravaStatusResponse>, AppError> {
    let session = require_session(&state, &headers)?;

    let mut settings = state.settings().get(&session.sub)?.unwrap_or_default();
    settings.strava_tokens = None;
    settings.strava_connected = false;
    state.settings().put(&session.sub, &settings)?;

    tracing::info!(user_id = %session.sub, "Strava disconnected");
    Ok(Json(StravaStatusResponse {
        strava_connected: false,
        athlete_id: None,
    }))
}

/// Runs since the plan start date, as the dashboard sees them.
async fn list_runs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ActivityRecord>>, AppError> {
    let session = require_session(&state, &headers)?;
    let mut settings = state.settings().get(&session.sub)?.unwrap_or_default();
    if !settings.strava_connected {
        return Err(StravaError::NotConnected.into());
    }
    let since = parse_start_date(settings.start_date.as_deref())?;

    let runs = fetch_runs_for_user(&state, &session.sub, &mut settings, since).await?;
    Ok(Json(runs))
}
