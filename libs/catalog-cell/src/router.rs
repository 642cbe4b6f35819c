use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn service_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_services).post(handlers::create_service))
        .route(
            "/{id}",
            put(handlers::update_service).delete(handlers::deactivate_service),
        )
        .route("/{id}/reactivate", post(handlers::reactivate_service))
        .with_state(state)
}

pub fn clinic_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_clinic))
        .with_state(state)
}
