use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    pipeline::{pace::marathon_pace_seconds, plan::parse_start_date},
    session::require_session,
    state::AppState,
    types::settings::UserSettings,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// Settings as shown to the user; Strava tokens stay server-side.
#[derive(Debug, Serialize)]
struct SettingsView {
    display_name: String,
    email: String,
    start_date: Option<String>,
    plan_id: Option<String>,
    goal_time: Option<String>,
    google_connected: bool,
    strava_connected: bool,
    demo: bool,
}

impl From<UserSettings> for SettingsView {
    fn from(settings: UserSettings) -> Self {
        Self {
            display_name: settings.display_name,
            email: settings.email,
            start_date: settings.start_date,
            plan_id: settings.plan_id,
            goal_time: settings.goal_time,
            google_connected: settings.google_connected,
            strava_connected: settings.strava_connected,
            demo: settings.demo,
        }
    }
}

/// Omitted fields are left alone; an empty string clears the field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsUpdate {
    display_name: Option<String>,
    start_date: Option<String>,
    plan_id: Option<String>,
    goal_time: Option<String>,
}

async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SettingsView>, AppError> {
    let session = require_session(&state, &headers)?;
    let settings = state.settings().get(&session.sub)?.unwrap_or_else(|| UserSettings {
        display_name: session.name.clone(),
        email: session.email.clone(),
        ..UserSettings::default()
    });
    Ok(Json(settings.into()))
}

async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, AppError> {
    let session = require_session(&state, &headers)?;
    let mut settings = state.settings().get(&session.sub)?.unwrap_or_default();

    if let Some(display_name) = update.display_name {
        settings.display_name = display_name.trim().to_string();
    }

    if let Some(start_date) = clearable(update.start_date) {
        settings.start_date = match start_date {
            Some(raw) => {
                let date = parse_start_date(Some(&raw)).map_err(|_| {
                    AppError::BadRequest(format!("Invalid start date '{}': expected YYYY-MM-DD", raw))
                })?;
                Some(date.format("%Y-%m-%d").to_string())
            }
            None => None,
        };
    }

    if let Some(goal_time) = clearable(update.goal_time) {
        if let Some(goal) = &goal_time {
            marathon_pace_seconds(goal)?;
        }
        settings.goal_time = goal_time;
    }

    if let Some(plan_id) = clearable(update.plan_id) {
        if let Some(plan_id) = &plan_id {
            if !state.plans().contains(plan_id)? {
                return Err(AppError::BadRequest(format!("Unknown training plan: {}", plan_id)));
            }
        }
        settings.plan_id = plan_id;
    }

    state.settings().put(&session.sub, &settings)?;
    tracing::info!(user_id = %session.sub, "Settings updated");
    Ok(Json(settings.into()))
}

/// `None` = not provided, `Some(None)` = clear, `Some(Some(v))` = set.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
