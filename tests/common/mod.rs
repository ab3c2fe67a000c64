//! Shared test utilities

use std::sync::Arc;

use axum::Router;
use parley_gateway::api::{health, session, voice, ApiState};
use parley_gateway::Config;

/// Build API state from a default configuration
#[must_use]
pub fn setup_state() -> Arc<ApiState> {
    Arc::new(ApiState::new(&Config::default()))
}

/// Build API state with a session capacity cap
#[must_use]
pub fn setup_state_with_capacity(max_sessions: usize) -> Arc<ApiState> {
    let config = Config {
        max_sessions,
        ..Config::default()
    };
    Arc::new(ApiState::new(&config))
}

/// Assemble the REST routes under test
#[must_use]
pub fn build_test_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(session::router(state.clone()))
        .nest("/api/voice", voice::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state))
}
