use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Everything the dashboard remembers about a user. Stored whole, keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    /// ISO date (YYYY-MM-DD) of plan day 0.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub goal_time: Option<String>,
    #[serde(default)]
    pub google_connected: bool,
    #[serde(default)]
    pub strava_connected: bool,
    #[serde(default)]
    pub demo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strava_tokens: Option<StravaTokens>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StravaTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub athlete_id: Option<u64>,
}

impl StravaTokens {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES) >= self.expires_at
    }
}
