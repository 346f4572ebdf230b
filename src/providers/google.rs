use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: Client,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo claims used to identify the runner.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl GoogleProfile {
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| self.email.split('@').next().map(str::to_string))
            .unwrap_or_default()
    }
}

impl GoogleClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: Client::new(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            userinfo_url: config.google_userinfo_url.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
        }
    }

    fn client_id(&self) -> Result<&str, AppError> {
        self.client_id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("GOOGLE_CLIENT_ID is not configured".to_string()))
    }

    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, AppError> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|err| AppError::Internal(format!("Invalid Google auth URL: {}", err)))?;
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id()?)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state);
        Ok(url.to_string())
    }

    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AppError> {
        let client_id = self.client_id()?;
        let client_secret = self.client_secret.as_deref().ok_or_else(|| {
            AppError::BadRequest("GOOGLE_CLIENT_SECRET is not configured".to_string())
        })?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|err| AppError::Internal(format!("Failed to exchange Google OAuth code: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Unauthorized(format!(
                "Google token exchange failed ({}): {}",
                status, body
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|err| AppError::Internal(format!("Invalid Google token response: {}", err)))?;
        Ok(payload.access_token)
    }

    pub async fn profile(&self, access_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| AppError::Internal(format!("Failed to fetch Google profile: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Unauthorized(format!(
                "Google userinfo request failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::Internal(format!("Invalid Google userinfo response: {}", err)))
    }
}
