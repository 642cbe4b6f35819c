use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn worker_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_workers).post(handlers::create_worker))
        .route(
            "/{id}",
            put(handlers::update_worker).delete(handlers::deactivate_worker),
        )
        .route("/{id}/reactivate", post(handlers::reactivate_worker))
        .with_state(state)
}
