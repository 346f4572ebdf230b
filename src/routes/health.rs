use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let plans = match state.plans().list() {
        Ok(plans) => plans.len(),
        Err(err) => {
            tracing::warn!(error = %err, "Plan directory unreadable");
            0
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "plans": plans,
        "demo": state.config().allow_demo,
    }))
}
