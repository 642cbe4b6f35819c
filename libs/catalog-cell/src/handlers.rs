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

use crate::models::{CatalogError, ClinicView, ServiceFilter, ServiceForm, ServiceList, ServiceMutation};
use crate::services::{load_clinic, CatalogService, ClinicService, ServicesPage};

fn admin_page(config: &AppConfig, session: &SessionContext) -> Result<ServicesPage, AppError> {
    if !session.profile.role().is_admin() {
        return Err(AppError::Forbidden(
            "Solo un administrador puede gestionar servicios".to_string(),
        ));
    }
    Ok(ServicesPage::new(CatalogService::new(session.backend(config))))
}

fn validation(err: CatalogError) -> AppError {
    AppError::ValidationError(err.to_string())
}

#[axum::debug_handler]
pub async fn list_services(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<ServiceFilter>,
) -> Result<Json<ServiceList>, AppError> {
    let list = admin_page(&config, &session)?
        .list(session.profile.id_clinica, &filter)
        .await
        .map_err(to_app_error)?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn create_service(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<ServiceForm>,
) -> Result<(StatusCode, Json<ServiceMutation>), AppError> {
    let page = admin_page(&config, &session)?;
    let request = form.to_create(session.profile.id_clinica).map_err(validation)?;

    let created = page.create(&request).await.map_err(to_app_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn update_service(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(service_id): Path<i64>,
    Json(form): Json<ServiceForm>,
) -> Result<Json<ServiceMutation>, AppError> {
    let page = admin_page(&config, &session)?;
    let request = form.to_update().map_err(validation)?;

    let updated = page.update(service_id, &request).await.map_err(to_app_error)?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn deactivate_service(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceMutation>, AppError> {
    let result = admin_page(&config, &session)?
        .deactivate(service_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn reactivate_service(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceMutation>, AppError> {
    let result = admin_page(&config, &session)?
        .reactivate(service_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn get_clinic(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ClinicView>, AppError> {
    let backend = session.backend(&config);
    let view = load_clinic(
        &ClinicService::new(backend.clone()),
        &BranchService::new(backend),
        session.profile.id_clinica,
    )
    .await
    .map_err(to_app_error)?;

    Ok(Json(view))
}
