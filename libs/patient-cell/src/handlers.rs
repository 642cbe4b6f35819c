use std::sync::Arc;

use axum::extract::{Extension, Json, Path, Query, State};

use shared_backend::to_app_error;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::SessionContext;

use crate::models::{PatientForm, PatientList, PatientSaved, PatientSearchQuery};
use crate::services::{PatientService, PatientsPage};

fn page(config: &AppConfig, session: &SessionContext) -> PatientsPage {
    PatientsPage::new(
        PatientService::new(session.backend(config)),
        session.profile.role(),
    )
}

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<PatientList>, AppError> {
    let list = page(&config, &session)
        .list(session.profile.id_clinica, query.busqueda.as_deref())
        .await
        .map_err(to_app_error)?;

    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(patient_id): Path<i64>,
    Json(form): Json<PatientForm>,
) -> Result<Json<PatientSaved>, AppError> {
    let request = form
        .to_request()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let saved = page(&config, &session)
        .save(patient_id, &request, form.historial.as_ref())
        .await
        .map_err(to_app_error)?;

    Ok(Json(saved))
}
