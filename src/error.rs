use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum PaceError {
    #[error("Invalid goal time '{0}': expected h:mm:ss or m:ss")]
    InvalidGoalTimeFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Set a training start date in Settings to see your plan")]
    MissingStartDate,
    #[error("Plan file has no '{column}' column (available columns: {})", .available.join(", "))]
    MissingRequiredColumn {
        column: &'static str,
        available: Vec<String>,
    },
    #[error("Unknown training plan: {0}")]
    UnknownPlan(String),
    #[error("Invalid plan CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read plan: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StravaError {
    #[error("Strava credentials expired, reconnect Strava in Settings")]
    CredentialExpired,
    #[error("Failed to fetch Strava activities: {0}")]
    ExternalFetchFailed(String),
    #[error("Strava is not connected")]
    NotConnected,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pace(#[from] PaceError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Strava(#[from] StravaError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Pace(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Plan(PlanError::UnknownPlan(_)) => StatusCode::NOT_FOUND,
            AppError::Plan(PlanError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Plan(_) => StatusCode::BAD_REQUEST,
            AppError::Strava(StravaError::NotConnected) => StatusCode::BAD_REQUEST,
            AppError::Strava(StravaError::CredentialExpired) => StatusCode::UNAUTHORIZED,
            AppError::Strava(StravaError::ExternalFetchFailed(_)) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Settings(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
