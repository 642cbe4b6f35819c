use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use shared_backend::to_app_error;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::SessionContext;

use crate::models::{Branch, BranchForm, BranchOverview, DayChanges, Holiday, HolidayForm};
use crate::services::{
    load_overview, BranchService, EditorError, EditorView, FailurePolicy, HolidayError,
    HolidayManager, ScheduleEditor, ScheduleError, ScheduleService,
};

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            EditorError::ReadOnly => (StatusCode::FORBIDDEN, json!({ "error": self.to_string() })),
            EditorError::Unavailable => (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() })),
            EditorError::Schedule(ScheduleError::InvalidRange { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            EditorError::Schedule(ScheduleError::Aborted { applied, op, message }) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "aplicados": applied, "operacion": op }),
            ),
            EditorError::Schedule(ScheduleError::Refresh { applied, message }) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "aplicados": applied }),
            ),
            EditorError::Holiday(HolidayError::Backend(e)) => return to_app_error(e).into_response(),
            EditorError::Holiday(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": e.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn require_admin(session: &SessionContext, action: &str) -> Result<(), AppError> {
    if session.profile.role().is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Solo un administrador puede {}", action)))
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveParams {
    #[serde(default)]
    pub policy: Option<FailurePolicy>,
}

#[axum::debug_handler]
pub async fn list_branches(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<BranchOverview>>, AppError> {
    let backend = session.backend(&config);
    let branches = BranchService::new(backend.clone());
    let schedules = ScheduleService::new(backend);

    let overview = load_overview(&branches, &schedules, session.profile.id_clinica)
        .await
        .map_err(to_app_error)?;

    Ok(Json(overview))
}

#[axum::debug_handler]
pub async fn create_branch(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<BranchForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&session, "crear sucursales")?;

    let request = form
        .to_request(session.profile.id_clinica)
        .ok_or_else(|| AppError::ValidationError("El nombre de la sucursal es obligatorio".to_string()))?;

    let branch = BranchService::new(session.backend(&config))
        .create(&request)
        .await
        .map_err(to_app_error)?;

    info!("Branch {} created by user {}", branch.id, session.profile.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "sucursal": branch, "mensaje": "Sucursal creada correctamente." })),
    ))
}

#[axum::debug_handler]
pub async fn get_branch(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Branch>, AppError> {
    let branch = BranchService::new(session.backend(&config))
        .get(branch_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(branch))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<i64>,
) -> Json<EditorView> {
    let store = ScheduleService::new(session.backend(&config));
    let editor = ScheduleEditor::open(&store, branch_id, session.profile.role().is_admin()).await;
    Json(editor.view())
}

/// Applies the day edits over the server's current week and reconciles.
#[axum::debug_handler]
pub async fn save_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<i64>,
    Query(params): Query<SaveParams>,
    Json(changes): Json<Vec<DayChanges>>,
) -> Result<Json<Value>, EditorError> {
    let store = ScheduleService::new(session.backend(&config));
    let mut editor = ScheduleEditor::open(&store, branch_id, session.profile.role().is_admin()).await;

    for change in changes {
        editor.update_day(change);
    }

    let report = editor.save(params.policy.unwrap_or_default()).await?;
    Ok(Json(json!({ "reporte": report, "editor": editor.view() })))
}

#[axum::debug_handler]
pub async fn list_holidays(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Vec<Holiday>>, EditorError> {
    let store = ScheduleService::new(session.backend(&config));
    let holidays = HolidayManager::new(&store).list(branch_id).await?;
    Ok(Json(holidays))
}

#[axum::debug_handler]
pub async fn add_holiday(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(branch_id): Path<i64>,
    Json(form): Json<HolidayForm>,
) -> Result<(StatusCode, Json<EditorView>), EditorError> {
    let store = ScheduleService::new(session.backend(&config));
    let mut editor = ScheduleEditor::open(&store, branch_id, session.profile.role().is_admin()).await;

    editor.add_holiday(&form.fecha, form.motivo.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(editor.view())))
}

#[axum::debug_handler]
pub async fn delete_holiday(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path((branch_id, holiday_id)): Path<(i64, i64)>,
) -> Result<Json<EditorView>, EditorError> {
    let store = ScheduleService::new(session.backend(&config));
    let mut editor = ScheduleEditor::open(&store, branch_id, session.profile.role().is_admin()).await;

    editor.remove_holiday(holiday_id).await?;
    Ok(Json(editor.view()))
}
