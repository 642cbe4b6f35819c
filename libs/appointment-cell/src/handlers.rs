use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use shared_backend::to_app_error;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::SessionContext;

use crate::models::{
    Appointment, AppointmentError, AppointmentFilter, AssignDoctorRequest, BookingError,
    ConsultationForm, InternalAppointmentForm, PublicBookingForm,
};
use crate::services::{
    parse_clinic_id, AppointmentBoard, AppointmentPage, AppointmentService, AppointmentUpdate,
    BookingView, ClinicRef, PageScope, PublicBooking,
};

impl IntoResponse for AppointmentError {
    fn into_response(self) -> Response {
        let status = match self {
            AppointmentError::Backend(e) => return to_app_error(e).into_response(),
            AppointmentError::CannotCreate | AppointmentError::CannotRegister => StatusCode::FORBIDDEN,
            AppointmentError::Incomplete | AppointmentError::InvalidConsultation => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match self {
            BookingError::Backend(e) => to_app_error(e).into_response(),
            other => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": other.to_string() })),
            )
                .into_response(),
        }
    }
}

fn page(config: &AppConfig, session: &SessionContext) -> AppointmentPage {
    AppointmentPage::new(session.backend(config), PageScope::for_profile(&session.profile))
}

#[axum::debug_handler]
pub async fn appointment_board(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<AppointmentFilter>,
) -> Json<AppointmentBoard> {
    Json(page(&config, &session).load(&filter).await)
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = page(&config, &session)
        .list(&filter)
        .await
        .map_err(to_app_error)?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn create_internal_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<AppointmentFilter>,
    Json(form): Json<InternalAppointmentForm>,
) -> Result<(StatusCode, Json<AppointmentUpdate>), AppointmentError> {
    let update = page(&config, &session).create_internal(&form, &filter).await?;
    Ok((StatusCode::CREATED, Json(update)))
}

#[axum::debug_handler]
pub async fn assign_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Path(appointment_id): Path<i64>,
    Query(filter): Query<AppointmentFilter>,
    Json(request): Json<AssignDoctorRequest>,
) -> Result<Json<AppointmentUpdate>, AppointmentError> {
    let update = page(&config, &session)
        .assign_doctor(appointment_id, &request, &filter)
        .await?;
    Ok(Json(update))
}

#[axum::debug_handler]
pub async fn register_consultation(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(filter): Query<AppointmentFilter>,
    Json(form): Json<ConsultationForm>,
) -> Result<(StatusCode, Json<AppointmentUpdate>), AppointmentError> {
    let update = page(&config, &session)
        .register_consultation(&form, &filter)
        .await?;
    Ok((StatusCode::CREATED, Json(update)))
}

#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    #[serde(default)]
    pub clinica: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    #[serde(default)]
    pub id_clinica: Option<ClinicRef>,
    #[serde(flatten)]
    pub formulario: PublicBookingForm,
}

/// Booking form for `?clinica=<id>`. Without the parameter the form starts
/// empty.
#[axum::debug_handler]
pub async fn booking_form(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<BookingView>, BookingError> {
    let service = AppointmentService::new(session.backend(&config));
    let mut booking = PublicBooking::new(&service, PublicBookingForm::default());

    if let Some(raw) = params.clinica.as_deref() {
        booking.load_catalog(parse_clinic_id(raw)).await?;
    }

    Ok(Json(booking.view()))
}

#[axum::debug_handler]
pub async fn submit_booking(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Json(submission): Json<BookingSubmission>,
) -> Result<(StatusCode, Json<BookingView>), BookingError> {
    let service = AppointmentService::new(session.backend(&config));
    let mut booking = PublicBooking::new(&service, submission.formulario);

    booking
        .load_catalog(submission.id_clinica.as_ref().and_then(ClinicRef::id))
        .await?;
    booking.submit().await?;

    Ok((StatusCode::CREATED, Json(booking.view())))
}
