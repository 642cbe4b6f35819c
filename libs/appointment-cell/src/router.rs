use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::appointment_board))
        .route(
            "/citas",
            get(handlers::list_appointments).post(handlers::create_internal_appointment),
        )
        .route("/citas/{id}/doctor", put(handlers::assign_doctor))
        .route("/consultas", post(handlers::register_consultation))
        .with_state(state)
}

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::booking_form).post(handlers::submit_booking))
        .with_state(state)
}
