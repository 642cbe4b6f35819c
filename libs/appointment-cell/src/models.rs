use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use patient_cell::Consultation;
use shared_models::time::to_iso_datetime;

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

/// Appointment status. Transitions are decided by the backend; the dashboard
/// only reads the code and requests changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn code(&self) -> u8 {
        match self {
            AppointmentStatus::Pending => 1,
            AppointmentStatus::Confirmed => 2,
            AppointmentStatus::Cancelled => 3,
            AppointmentStatus::Completed => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pendiente",
            AppointmentStatus::Confirmed => "Confirmada",
            AppointmentStatus::Cancelled => "Cancelada",
            AppointmentStatus::Completed => "Completada",
        }
    }
}

impl TryFrom<u8> for AppointmentStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AppointmentStatus::Pending),
            2 => Ok(AppointmentStatus::Confirmed),
            3 => Ok(AppointmentStatus::Cancelled),
            4 => Ok(AppointmentStatus::Completed),
            other => Err(format!("unknown appointment status {}", other)),
        }
    }
}

impl From<AppointmentStatus> for u8 {
    fn from(status: AppointmentStatus) -> u8 {
        status.code()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentServiceLine {
    #[serde(default, alias = "IdServicio")]
    pub id_servicio: i64,
    #[serde(default, alias = "NombreServicio")]
    pub nombre_servicio: String,
    #[serde(default, alias = "DuracionMin")]
    pub duracion_min: i32,
    #[serde(default, alias = "Precio")]
    pub precio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "IdSucursal")]
    pub id_sucursal: i64,
    #[serde(default, alias = "IdPaciente")]
    pub id_paciente: i64,
    #[serde(default, alias = "IdDoctor")]
    pub id_doctor: Option<i64>,
    #[serde(default, alias = "NombrePaciente")]
    pub nombre_paciente: String,
    #[serde(default, alias = "CorreoPaciente")]
    pub correo_paciente: String,
    #[serde(default, alias = "TelefonoPaciente")]
    pub telefono_paciente: String,
    #[serde(default, alias = "FechaHoraInicioPlan")]
    pub fecha_hora_inicio_plan: String,
    #[serde(default, alias = "FechaHoraFinPlan")]
    pub fecha_hora_fin_plan: String,
    #[serde(default, alias = "FechaHoraInicioReal")]
    pub fecha_hora_inicio_real: Option<String>,
    #[serde(default, alias = "FechaHoraFinReal")]
    pub fecha_hora_fin_real: Option<String>,
    #[serde(default, alias = "Estado")]
    pub estado: AppointmentStatus,
    #[serde(default, alias = "Notas")]
    pub notas: String,
    #[serde(default, alias = "SubTotal")]
    pub sub_total: f64,
    #[serde(default, alias = "TotalFinal")]
    pub total_final: f64,
    #[serde(default, alias = "FechaCreacion")]
    pub fecha_creacion: String,
    #[serde(default, alias = "Servicios")]
    pub servicios: Vec<AppointmentServiceLine>,
    #[serde(default, alias = "ConsultaMedica")]
    pub consulta_medica: Option<Consultation>,
}

impl Appointment {
    /// Still waiting for its consultation: none recorded and not cancelled.
    pub fn awaits_consultation(&self) -> bool {
        self.consulta_medica.is_none() && self.estado != AppointmentStatus::Cancelled
    }
}

/// `GET /api/Citas/clinica/{id}` filters. Also the page's query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_desde: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_hasta: Option<String>,
    #[serde(default)]
    pub id_sucursal: Option<i64>,
    #[serde(default)]
    pub estado: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInternalRequest {
    pub id_clinica: i64,
    pub id_sucursal: i64,
    pub id_paciente: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_doctor: Option<i64>,
    pub fecha_hora_inicio_plan: String,
    pub ids_servicios: Vec<i64>,
    pub notas: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_inicial: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicRequest {
    pub id_clinica: i64,
    pub id_sucursal: i64,
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub correo: String,
    pub fecha_hora_inicio_plan: String,
    pub notas: String,
    pub ids_servicios: Vec<i64>,
}

/// An absent doctor unassigns the appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDoctorRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_doctor: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConsultationRequest {
    pub diagnostico: String,
    pub tratamiento: String,
    pub receta: String,
    pub examenes_solicitados: String,
    pub notas_medicas: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_consulta: Option<String>,
}

// ==============================================================================
// PUBLIC CATALOG
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBranch {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "Nombre")]
    pub nombre: String,
    #[serde(default, alias = "Direccion")]
    pub direccion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicService {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "NombreServicio")]
    pub nombre_servicio: String,
    #[serde(default, alias = "DuracionMin")]
    pub duracion_min: i32,
    #[serde(default, alias = "PrecioBase")]
    pub precio_base: f64,
}

/// What an anonymous visitor may book at a clinic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCatalog {
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "Sucursales")]
    pub sucursales: Vec<PublicBranch>,
    #[serde(default, alias = "Servicios")]
    pub servicios: Vec<PublicService>,
}

impl PublicCatalog {
    pub fn has_branch(&self, branch_id: i64) -> bool {
        self.sucursales.iter().any(|b| b.id == branch_id)
    }

    pub fn has_service(&self, service_id: i64) -> bool {
        self.servicios.iter().any(|s| s.id == service_id)
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("No tienes permisos para crear citas internas")]
    CannotCreate,

    #[error("No tienes permisos para registrar consultas")]
    CannotRegister,

    #[error("Completa los campos obligatorios para crear la cita")]
    Incomplete,

    #[error("Selecciona una cita y agrega un diagnóstico válido")]
    InvalidConsultation,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Debes indicar un ID de clínica válido.")]
    InvalidClinic,

    #[error("Completa los campos requeridos para agendar la cita.")]
    Incomplete,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

// ==============================================================================
// FORMS
// ==============================================================================

pub const MIN_DIAGNOSIS_CHARS: usize = 3;

// Optional text fields are sent trimmed, empty when left blank.
fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// "New internal appointment" dialog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalAppointmentForm {
    #[serde(default)]
    pub id_sucursal: Option<i64>,
    #[serde(default)]
    pub id_paciente: Option<i64>,
    #[serde(default)]
    pub id_doctor: Option<i64>,
    #[serde(default)]
    pub fecha_hora_inicio_plan: String,
    #[serde(default)]
    pub ids_servicios: Vec<i64>,
    #[serde(default)]
    pub estado_inicial: Option<AppointmentStatus>,
    #[serde(default)]
    pub notas: String,
}

impl InternalAppointmentForm {
    /// Requires branch, patient, datetime and one service. The initial status
    /// defaults to confirmed.
    pub fn to_request(&self, clinic_id: i64) -> Result<CreateInternalRequest, AppointmentError> {
        let id_sucursal = self.id_sucursal.filter(|id| *id > 0);
        let id_paciente = self.id_paciente.filter(|id| *id > 0);
        let datetime = self.fecha_hora_inicio_plan.trim();

        let (Some(id_sucursal), Some(id_paciente)) = (id_sucursal, id_paciente) else {
            return Err(AppointmentError::Incomplete);
        };
        if clinic_id <= 0 || datetime.is_empty() || self.ids_servicios.is_empty() {
            return Err(AppointmentError::Incomplete);
        }

        Ok(CreateInternalRequest {
            id_clinica: clinic_id,
            id_sucursal,
            id_paciente,
            id_doctor: self.id_doctor.filter(|id| *id > 0),
            fecha_hora_inicio_plan: to_iso_datetime(datetime),
            ids_servicios: self.ids_servicios.clone(),
            notas: trimmed(&self.notas),
            estado_inicial: Some(self.estado_inicial.unwrap_or(AppointmentStatus::Confirmed)),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationForm {
    #[serde(default)]
    pub id_cita: Option<i64>,
    #[serde(default)]
    pub diagnostico: String,
    #[serde(default)]
    pub tratamiento: String,
    #[serde(default)]
    pub receta: String,
    #[serde(default)]
    pub examenes_solicitados: String,
    #[serde(default)]
    pub notas_medicas: String,
}

impl ConsultationForm {
    /// The target appointment and the request, once a diagnosis of at least
    /// three characters is present.
    pub fn to_request(&self) -> Result<(i64, RegisterConsultationRequest), AppointmentError> {
        let appointment_id = self
            .id_cita
            .filter(|id| *id > 0)
            .ok_or(AppointmentError::InvalidConsultation)?;

        let diagnostico = self.diagnostico.trim();
        if diagnostico.chars().count() < MIN_DIAGNOSIS_CHARS {
            return Err(AppointmentError::InvalidConsultation);
        }

        Ok((
            appointment_id,
            RegisterConsultationRequest {
                diagnostico: diagnostico.to_string(),
                tratamiento: trimmed(&self.tratamiento),
                receta: trimmed(&self.receta),
                examenes_solicitados: trimmed(&self.examenes_solicitados),
                notas_medicas: trimmed(&self.notas_medicas),
                fecha_consulta: None,
            },
        ))
    }
}

/// Visitor fields of the public booking form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBookingForm {
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub fecha_hora_inicio_plan: String,
    #[serde(default)]
    pub id_sucursal: Option<i64>,
    #[serde(default)]
    pub ids_servicios: Vec<i64>,
    #[serde(default)]
    pub notas: String,
}

impl PublicBookingForm {
    pub fn branch(&self) -> Option<i64> {
        self.id_sucursal.filter(|id| *id > 0)
    }

    pub fn to_request(&self, clinic_id: i64, branch_id: i64) -> CreatePublicRequest {
        CreatePublicRequest {
            id_clinica: clinic_id,
            id_sucursal: branch_id,
            nombres: self.nombres.trim().to_string(),
            apellidos: self.apellidos.trim().to_string(),
            telefono: trimmed(&self.telefono),
            correo: self.correo.trim().to_lowercase(),
            fecha_hora_inicio_plan: to_iso_datetime(self.fecha_hora_inicio_plan.trim()),
            notas: trimmed(&self.notas),
            ids_servicios: self.ids_servicios.clone(),
        }
    }
}
