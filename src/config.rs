use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub plan_dir: PathBuf,
    /// `None` keeps settings in memory only.
    pub settings_path: Option<PathBuf>,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub oauth_state_ttl: Duration,
    pub allow_demo: bool,
    pub app_base_url: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
    pub strava_client_id: Option<String>,
    pub strava_client_secret: Option<String>,
    pub strava_redirect_uri: String,
    pub strava_oauth_base: String,
    pub strava_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            plan_dir: PathBuf::from("plans"),
            settings_path: None,
            jwt_secret: "dev-secret-change-me".to_string(),
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            oauth_state_ttl: Duration::from_secs(10 * 60),
            allow_demo: true,
            app_base_url: "http://localhost:3000".to_string(),
            google_client_id: None,
            google_client_secret: None,
            google_redirect_uri: "http://localhost:3000/oauth/google".to_string(),
            google_auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            google_token_url: "https://oauth2.googleapis.com/token".to_string(),
            google_userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            strava_client_id: None,
            strava_client_secret: None,
            strava_redirect_uri: "http://localhost:3000/oauth/strava".to_string(),
            strava_oauth_base: "https://www.strava.com".to_string(),
            strava_api_base: "https://www.strava.com/api/v3".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let session_ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.session_ttl.as_secs());

        let oauth_state_ttl_seconds = std::env::var("OAUTH_STATE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.oauth_state_ttl.as_secs());

        let allow_demo = std::env::var("ALLOW_DEMO")
            .ok()
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.allow_demo);

        // The web UI picks up OAuth redirects and forwards code/state to the API callbacks.
        let app_base_url = non_empty_env("APP_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.app_base_url);
        let google_redirect_uri = non_empty_env("GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|| format!("{}/oauth/google", app_base_url));
        let strava_redirect_uri = non_empty_env("STRAVA_REDIRECT_URI")
            .unwrap_or_else(|| format!("{}/oauth/strava", app_base_url));

        Self {
            port,
            plan_dir: std::env::var("PLAN_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.plan_dir),
            settings_path: Some(
                std::env::var("SETTINGS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data/settings.json")),
            ),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            session_ttl: Duration::from_secs(session_ttl_seconds),
            oauth_state_ttl: Duration::from_secs(oauth_state_ttl_seconds),
            allow_demo,
            app_base_url,
            google_client_id: non_empty_env("GOOGLE_CLIENT_ID"),
            google_client_secret: non_empty_env("GOOGLE_CLIENT_SECRET"),
            google_redirect_uri,
            google_auth_url: defaults.google_auth_url,
            google_token_url: defaults.google_token_url,
            google_userinfo_url: defaults.google_userinfo_url,
            strava_client_id: non_empty_env("STRAVA_CLIENT_ID"),
            strava_client_secret: non_empty_env("STRAVA_CLIENT_SECRET"),
            strava_redirect_uri,
            strava_oauth_base: defaults.strava_oauth_base,
            strava_api_base: defaults.strava_api_base,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
