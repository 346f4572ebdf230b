use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, StravaError};
use crate::state::AppState;
use crate::types::activity::ActivityRecord;
use crate::types::settings::{StravaTokens, UserSettings};

const PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 20;
const RUN_SPORT_TYPES: &[&str] = &["Run", "TrailRun", "VirtualRun"];

#[derive(Debug, Clone)]
pub struct StravaClient {
    http: Client,
    oauth_base: String,
    api_base: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
    #[serde(default)]
    athlete: Option<AthleteInfo>,
}

#[derive(Debug, Deserialize)]
struct AthleteInfo {
    id: u64,
}

/// The subset of Strava's activity summary the dashboard reads.
#[derive(Debug, Deserialize)]
struct StravaActivity {
    #[serde(default)]
    sport_type: Option<String>,
    #[serde(rename = "type", default)]
    activity_type: Option<String>,
    #[serde(default)]
    start_date_local: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    distance: Option<f64>,
}

impl StravaActivity {
    fn is_run(&self) -> bool {
        self.sport_type
            .as_deref()
            .or(self.activity_type.as_deref())
            .is_some_and(|kind| RUN_SPORT_TYPES.contains(&kind))
    }

    /// Local calendar date the run started on. Strava stamps local time with a
    /// `Z` suffix, so the date part is taken as-is.
    fn local_date(&self) -> Option<NaiveDate> {
        self.start_date_local
            .as_deref()
            .or(self.start_date.as_deref())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|stamp| stamp.date_naive())
    }

    fn into_record(self) -> Option<ActivityRecord> {
        if !self.is_run() {
            return None;
        }
        let date = self.local_date()?;
        Some(ActivityRecord::from_meters(date, self.distance.unwrap_or(0.0)))
    }
}

impl StravaClient {
    pub fn from_config(config: &Config) -> Self {
        Self::new_with_base_url(
            &config.strava_oauth_base,
            &config.strava_api_base,
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
    }

    pub fn new_with_base_url(
        oauth_base: &str,
        api_base: &str,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            oauth_base: oauth_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("STRAVA_CLIENT_ID is not configured".to_string()))?;
        let client_secret = self.client_secret.as_deref().ok_or_else(|| {
            AppError::BadRequest("STRAVA_CLIENT_SECRET is not configured".to_string())
        })?;
        Ok((client_id, client_secret))
    }

    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, AppError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("STRAVA_CLIENT_ID is not configured".to_string()))?;
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.oauth_base))
            .map_err(|err| AppError::Internal(format!("Invalid Strava OAuth base URL: {}", err)))?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("approval_prompt", "auto")
            .append_pair("scope", "read,activity:read_all")
            .append_pair("state", state);
        Ok(url.to_string())
    }

    pub async fn exchange_code(&self, code: &str) -> Result<StravaTokens, AppError> {
        let (client_id, client_secret) = self.credentials()?;
        let response = self
            .http
            .post(format!("{}/oauth/token", self.oauth_base))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|err| {
                AppError::Internal(format!("Failed to exchange Strava OAuth token: {}", err))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::BadRequest(format!(
                "Strava token exchange failed ({}): {}",
                status, body
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|err| AppError::Internal(format!("Invalid Strava token response: {}", err)))?;
        Ok(tokens_from_response(payload))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<StravaTokens, StravaError> {
        let (client_id, client_secret) = self
            .credentials()
            .map_err(|err| StravaError::ExternalFetchFailed(err.to_string()))?;
        let response = self
            .http
            .post(format!("{}/oauth/token", self.oauth_base))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|err| StravaError::ExternalFetchFailed(err.to_string()))?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(StravaError::CredentialExpired)
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(StravaError::ExternalFetchFailed(format!(
                    "token refresh failed ({}): {}",
                    status, body
                )));
            }
            _ => {}
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|err| StravaError::ExternalFetchFailed(err.to_string()))?;
        Ok(tokens_from_response(payload))
    }

    /// All runs started after `after` (unix seconds), oldest pages last.
    pub async fn fetch_runs(
        &self,
        access_token: &str,
        after: Option<i64>,
    ) -> Result<Vec<ActivityRecord>, StravaError> {
        let mut records = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut url = format!(
                "{}/athlete/activities?per_page={}&page={}",
                self.api_base, PER_PAGE, page
            );
            if let Some(after) = after {
                url.push_str(&format!("&after={}", after));
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(access_token)
                .send()
                .await
                .map_err(|err| StravaError::ExternalFetchFailed(err.to_string()))?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(StravaError::CredentialExpired);
            }
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(StravaError::ExternalFetchFailed(format!(
                    "activities request failed ({}): {}",
                    status, body
                )));
            }

            let activities: Vec<StravaActivity> = response
                .json()
                .await
                .map_err(|err| StravaError::ExternalFetchFailed(err.to_string()))?;
            let page_len = activities.len();
            records.extend(activities.into_iter().filter_map(StravaActivity::into_record));

            if page_len < PER_PAGE as usize {
                break;
            }
        }

        Ok(records)
    }
}

fn tokens_from_response(payload: TokenResponse) -> StravaTokens {
    StravaTokens {
        access_token: payload.access_token,
        refresh_token: payload.refresh_token,
        expires_at: DateTime::from_timestamp(payload.expires_at, 0).unwrap_or_else(Utc::now),
        athlete_id: payload.athlete.map(|athlete| athlete.id),
    }
}

/// Fetches the user's runs since the plan started, refreshing the access token
/// first when it is about to expire. Refreshed tokens are written back to the
/// user's settings.
pub async fn fetch_runs_for_user(
    state: &AppState,
    user_id: &str,
    settings: &mut UserSettings,
    since: NaiveDate,
) -> Result<Vec<ActivityRecord>, StravaError> {
    let mut tokens = settings
        .strava_tokens
        .clone()
        .ok_or(StravaError::NotConnected)?;

    if tokens.needs_refresh(Utc::now()) {
        tracing::info!(user_id = %user_id, "Refreshing Strava access token");
        tokens = state.strava().refresh(&tokens.refresh_token).await?;
        settings.strava_tokens = Some(tokens.clone());
        if let Err(err) = state.settings().put(user_id, settings) {
            tracing::warn!(user_id = %user_id, error = %err, "Failed to persist refreshed Strava tokens");
        }
    }

    // A day of slack so runs on the start date in any timezone are included.
    let after = since
        .pred_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp());

    let runs = state.strava().fetch_runs(&tokens.access_token, after).await?;
    tracing::info!(user_id = %user_id, runs = runs.len(), "Fetched Strava runs");
    Ok(runs)
}
