use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::config::Config;
use crate::pipeline::plan::PlanCatalog;
use crate::providers::google::GoogleClient;
use crate::providers::strava::StravaClient;
use crate::settings::{InMemorySettingsStore, JsonFileSettingsStore, SettingsRepository};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    settings: Arc<dyn SettingsRepository>,
    plans: PlanCatalog,
    google: GoogleClient,
    strava: StravaClient,
    oauth_states: Arc<DashMap<String, PendingOAuth>>,
    clock: Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Strava,
}

/// An authorize redirect we are waiting on. Strava links carry the user who
/// started them, Google sign-ins do not have one yet.
#[derive(Debug, Clone)]
pub struct PendingOAuth {
    pub provider: OAuthProvider,
    pub user_id: Option<String>,
    pub expires_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let settings: Arc<dyn SettingsRepository> = match &config.settings_path {
            Some(path) => Arc::new(JsonFileSettingsStore::new(path.clone())),
            None => Arc::new(InMemorySettingsStore::new()),
        };
        Self {
            plans: PlanCatalog::new(config.plan_dir.clone()),
            google: GoogleClient::from_config(&config),
            strava: StravaClient::from_config(&config),
            config: Arc::new(config),
            settings,
            oauth_states: Arc::new(DashMap::new()),
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsRepository>) -> Self {
        self.settings = settings;
        self
    }

    /// Pins "today" to a fixed date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.clock = Arc::new(move || today);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &dyn SettingsRepository {
        self.settings.as_ref()
    }

    pub fn plans(&self) -> &PlanCatalog {
        &self.plans
    }

    pub fn google(&self) -> &GoogleClient {
        &self.google
    }

    pub fn strava(&self) -> &StravaClient {
        &self.strava
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn store_oauth_state(&self, state: String, provider: OAuthProvider, user_id: Option<String>) {
        self.oauth_states.insert(
            state,
            PendingOAuth {
                provider,
                user_id,
                expires_at: Instant::now() + self.config.oauth_state_ttl,
            },
        );
    }

    /// Consumes a pending state. Each state can be redeemed once, and only by
    /// the provider that issued it; a mismatched lookup leaves it in place.
    pub fn take_oauth_state(&self, state: &str, provider: OAuthProvider) -> Option<PendingOAuth> {
        let now = Instant::now();
        self.oauth_states
            .remove_if(state, |_, pending| {
                pending.provider == provider && pending.expires_at > now
            })
            .map(|(_, pending)| pending)
    }

    pub fn pending_oauth_states(&self) -> usize {
        self.oauth_states.len()
    }

    pub fn evict_expired(&self) {
        let now = Instant::now();
        let before = self.oauth_states.len();
        self.oauth_states.retain(|_, pending| pending.expires_at > now);
        let evicted = before.saturating_sub(self.oauth_states.len());
        if evicted > 0 {
            tracing::debug!(
                evicted,
                pending = self.oauth_states.len(),
                "Evicted expired OAuth states"
            );
        }
    }
}

pub const EVICTION_INTERVAL: Duration = Duration::from_secs(300);
