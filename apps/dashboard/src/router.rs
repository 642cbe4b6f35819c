use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

use appointment_cell::router::{appointment_routes, booking_routes};
use auth_cell::router::{auth_routes, profile_routes, session_routes};
use auth_cell::SessionView;
use branch_cell::router::branch_routes;
use catalog_cell::router::{clinic_routes, service_routes};
use patient_cell::router::patient_routes;
use shared_config::AppConfig;
use shared_utils::extractor::{edge_middleware, SessionContext};
use staff_cell::router::worker_routes;

const UNAUTHORIZED_MESSAGE: &str = "Error 401: sin permisos para esta vista";

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(dashboard_home))
        .route("/401", get(unauthorized_page))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/session", session_routes(state.clone()))
        .nest("/profile", profile_routes(state.clone()))
        .nest("/branches", branch_routes(state.clone()))
        .nest("/appointment", appointment_routes(state.clone()))
        .nest("/agendar-cita", booking_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/doctors", worker_routes(state.clone()))
        .nest("/services", service_routes(state.clone()))
        .nest("/clinic", clinic_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, edge_middleware))
}

async fn dashboard_home(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(json!({
        "titulo": "Panel General",
        "sesion": SessionView::from_profile(session.profile),
    }))
}

async fn unauthorized_page() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": UNAUTHORIZED_MESSAGE,
            "detalle": "Tu rol actual no tiene acceso a este módulo.",
            "enlaces": [
                { "ruta": "/", "etiqueta": "Volver al inicio" },
                { "ruta": "/appointment", "etiqueta": "Ir a citas" }
            ]
        })),
    )
}
