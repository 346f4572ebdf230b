pub mod auth;
pub mod dashboard;
pub mod health;
pub mod plans;
pub mod settings;
pub mod strava;

use axum::Router;

use crate::state::AppState;

/// Every API route, without static assets or middleware.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(strava::router())
        .merge(settings::router())
        .merge(plans::router())
        .merge(dashboard::router())
}
