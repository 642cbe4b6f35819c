use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn branch_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_branches).post(handlers::create_branch))
        .route("/{id}", get(handlers::get_branch))
        .route(
            "/{id}/schedule",
            get(handlers::get_schedule).put(handlers::save_schedule),
        )
        .route(
            "/{id}/holidays",
            get(handlers::list_holidays).post(handlers::add_holiday),
        )
        .route("/{id}/holidays/{holiday_id}", delete(handlers::delete_holiday))
        .with_state(state)
}
