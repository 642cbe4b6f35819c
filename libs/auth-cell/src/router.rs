use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Sign-in flows, reachable without a session.
pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
        .with_state(state)
}

pub fn session_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_session).delete(handlers::logout))
        .with_state(state)
}

pub fn profile_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_profile))
        .route("/password", put(handlers::change_password))
        .with_state(state)
}
