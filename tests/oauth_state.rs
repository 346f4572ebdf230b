use std::time::Duration;

use marathon_dash::config::Config;
use marathon_dash::state::{AppState, OAuthProvider};

#[test]
fn state_is_redeemed_once_by_its_provider() {
    let state = AppState::new(Config::default());
    state.store_oauth_state("abc".to_string(), OAuthProvider::Strava, Some("google:1".to_string()));

    let pending = state
        .take_oauth_state("abc", OAuthProvider::Strava)
        .expect("pending state");
    assert_eq!(pending.user_id.as_deref(), Some("google:1"));
    assert!(state.take_oauth_state("abc", OAuthProvider::Strava).is_none());
}

#[test]
fn wrong_provider_leaves_the_state_pending() {
    let state = AppState::new(Config::default());
    state.store_oauth_state("abc".to_string(), OAuthProvider::Google, None);

    assert!(state.take_oauth_state("abc", OAuthProvider::Strava).is_none());
    assert_eq!(state.pending_oauth_states(), 1);
    assert!(state.take_oauth_state("abc", OAuthProvider::Google).is_some());
    assert_eq!(state.pending_oauth_states(), 0);
}

#[test]
fn expired_states_are_refused_and_evicted() {
    let state = AppState::new(Config {
        oauth_state_ttl: Duration::ZERO,
        ..Config::default()
    });
    state.store_oauth_state("old".to_string(), OAuthProvider::Google, None);

    assert!(state.take_oauth_state("old", OAuthProvider::Google).is_none());
    assert_eq!(state.pending_oauth_states(), 1);

    state.evict_expired();
    assert_eq!(state.pending_oauth_states(), 0);
}
