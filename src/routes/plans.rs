use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/plans", get(list_plans))
}

#[derive(Debug, Serialize)]
struct PlansResponse {
    plans: Vec<String>,
}

async fn list_plans(State(state): State<AppState>) -> Result<Json<PlansResponse>, AppError> {
    Ok(Json(PlansResponse {
        plans: state.plans().list()?,
    }))
}
