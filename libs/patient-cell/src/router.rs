use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients))
        .route("/{id}", put(handlers::update_patient))
        .with_state(state)
}
