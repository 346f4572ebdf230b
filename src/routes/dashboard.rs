use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    error::AppError,
    pipeline::{
        dashboard::build_dashboard,
        plan::{load_plan, parse_start_date},
    },
    providers::strava::fetch_runs_for_user,
    session::require_session,
    state::AppState,
    types::dashboard::Dashboard,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    display_name: String,
    plan_id: String,
    strava_connected: bool,
    #[serde(flatten)]
    dashboard: Dashboard,
}

/// One full render: plan, activities, comparison and recommendation. Either
/// the whole table comes back or an error does; a Strava failure degrades to
/// no activities plus a warning.
async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = require_session(&state, &headers)?;
    let mut settings = state.settings().get(&session.sub)?.unwrap_or_default();

    let start_date = parse_start_date(settings.start_date.as_deref())?;
    let plan_id = state.plans().resolve(settings.plan_id.as_deref())?;
    let rows = state.plans().read(&plan_id)?;
    let entries = load_plan(&rows, Some(start_date))?;

    let mut warnings = Vec::new();
    let activities = if settings.demo || !settings.strava_connected {
        Vec::new()
    } else {
        match fetch_runs_for_user(&state, &session.sub, &mut settings, start_date).await {
            Ok(runs) => runs,
            Err(err) => {
                tracing::warn!(user_id = %session.sub, error = %err, "Rendering without Strava activities");
                warnings.push(err.to_string());
                Vec::new()
            }
        }
    };

    let mut dashboard = build_dashboard(
        &entries,
        &activities,
        state.today(),
        settings.goal_time.as_deref(),
    );
    dashboard.warnings.extend(warnings);

    tracing::info!(
        user_id = %session.sub,
        plan_id = %plan_id,
        plan_days = entries.len(),
        activities = activities.len(),
        "Rendered dashboard"
    );

    Ok(Json(DashboardResponse {
        display_name: settings.display_name,
        plan_id,
        strava_connected: settings.strava_connected,
        dashboard,
    }))
}
