use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
};

use branch_cell::BranchService;
use shared_backend::to_app_error;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::SessionContext;

use crate::models::{StaffError, WorkerFilter, WorkerForm, WorkerMutation};
use crate::services::{WorkerService, WorkersPage, WorkersView};

/// The workers page is for admins only; other roles get nothing.
fn admin_page(config: &AppConfig, session: &SessionContext) -> Result<WorkersPage, AppError> {
    if !session.profile.role().is_admin() {
        return Err(AppError::Forbidden(
            "Solo un administrador puede gestionar trabajadores".to_string(),
        ));
    }
    let backend = session.backend(config);
    Ok(WorkersPage::new(
        WorkerService::new(backend.clone()),
        BranchService::new(backend),
    ))
}

fn validation(err: StaffError) -> AppError {
    AppError::ValidationError(err.to_string())
}

#[axum::debug_handler]
pub async fn list_workers(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<WorkerFilter>,
) -> Result<Json<WorkersView>, AppError> {
    let view = admin_page(&config, &session)?
        .load(session.profile.id_clinica, &filter)
        .await
        .map_err(to_app_error)?;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn create_worker(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<WorkerForm>,
) -> Result<(StatusCode, Json<WorkerMutation>), AppError> {
    let page = admin_page(&config, &session)?;
    let request = form.to_create(session.profile.id_clinica).map_err(validation)?;

    let created = page.create(&request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_worker(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(worker_id): Path<i64>,
    Json(form): Json<WorkerForm>,
) -> Result<Json<WorkerMutation>, AppError> {
    let page = admin_page(&config, &session)?;
    let request = form.to_update().map_err(validation)?;

    let updated = page.update(worker_id, &request).await.map_err(to_app_error)?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn deactivate_worker(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(worker_id): Path<i64>,
) -> Result<Json<WorkerMutation>, AppError> {
    let result = admin_page(&config, &session)?
        .deactivate(worker_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn reactivate_worker(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(worker_id): Path<i64>,
) -> Result<Json<WorkerMutation>, AppError> {
    let result = admin_page(&config, &session)?
        .reactivate(worker_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(result))
}
