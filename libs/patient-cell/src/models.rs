use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Medical consultation attached to an appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdCita")]
    pub id_cita: i64,
    #[serde(default, alias = "IdPaciente")]
    pub id_paciente: i64,
    #[serde(default, alias = "IdDoctor")]
    pub id_doctor: Option<i64>,
    #[serde(default, alias = "Diagnostico")]
    pub diagnostico: String,
    #[serde(default, alias = "Tratamiento")]
    pub tratamiento: String,
    #[serde(default, alias = "Receta")]
    pub receta: String,
    #[serde(default, alias = "ExamenesSolicitados")]
    pub examenes_solicitados: String,
    #[serde(default, alias = "NotasMedicas")]
    pub notas_medicas: String,
    #[serde(default, alias = "FechaConsulta")]
    pub fecha_consulta: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalHistory {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdPaciente")]
    pub id_paciente: i64,
    #[serde(default, alias = "EnfermedadesPrevias")]
    pub enfermedades_previas: String,
    #[serde(default, alias = "MedicamentosActuales")]
    pub medicamentos_actuales: String,
    #[serde(default, alias = "Alergias")]
    pub alergias: String,
    #[serde(default, alias = "AntecedentesFamiliares")]
    pub antecedentes_familiares: String,
    #[serde(default, alias = "Observaciones")]
    pub observaciones: String,
    #[serde(default, alias = "FechaCreacion")]
    pub fecha_creacion: String,
    #[serde(default, alias = "FechaActualizacion")]
    pub fecha_actualizacion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "Nombres")]
    pub nombres: String,
    #[serde(default, alias = "Apellidos")]
    pub apellidos: String,
    #[serde(default, alias = "NombreCompleto")]
    pub nombre_completo: String,
    #[serde(default, alias = "Telefono")]
    pub telefono: String,
    #[serde(default, alias = "Correo")]
    pub correo: String,
    #[serde(default, alias = "FechaNacimiento")]
    pub fecha_nacimiento: Option<String>,
    #[serde(default, alias = "FechaRegistro")]
    pub fecha_registro: String,
    #[serde(default, alias = "HistorialClinico")]
    pub historial_clinico: Option<ClinicalHistory>,
    #[serde(default, alias = "ConsultasRecientes")]
    pub consultas_recientes: Vec<Consultation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub nombres: String,
    pub apellidos: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub correo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistoryRequest {
    #[serde(default)]
    pub enfermedades_previas: Option<String>,
    #[serde(default)]
    pub medicamentos_actuales: Option<String>,
    #[serde(default)]
    pub alergias: Option<String>,
    #[serde(default)]
    pub antecedentes_familiares: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

impl UpdateHistoryRequest {
    pub fn trimmed(&self) -> Self {
        let trim = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());
        Self {
            enfermedades_previas: trim(&self.enfermedades_previas),
            medicamentos_actuales: trim(&self.medicamentos_actuales),
            alergias: trim(&self.alergias),
            antecedentes_familiares: trim(&self.antecedentes_familiares),
            observaciones: trim(&self.observaciones),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatientError {
    #[error("{0} es obligatorio")]
    MissingField(&'static str),
}

/// Edit dialog payload: the patient's data plus, for clinical staff, the
/// clinical history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientForm {
    #[serde(default)]
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(default)]
    pub historial: Option<UpdateHistoryRequest>,
}

impl PatientForm {
    /// Prefills the dialog; the birth date keeps only its date part.
    pub fn from_patient(patient: &Patient) -> Self {
        let history = patient.historial_clinico.clone().unwrap_or_default();
        Self {
            nombres: patient.nombres.clone(),
            apellidos: patient.apellidos.clone(),
            correo: patient.correo.clone(),
            telefono: Some(patient.telefono.clone()),
            fecha_nacimiento: patient
                .fecha_nacimiento
                .as_deref()
                .map(|date| date.chars().take(10).collect()),
            historial: Some(UpdateHistoryRequest {
                enfermedades_previas: Some(history.enfermedades_previas),
                medicamentos_actuales: Some(history.medicamentos_actuales),
                alergias: Some(history.alergias),
                antecedentes_familiares: Some(history.antecedentes_familiares),
                observaciones: Some(history.observaciones),
            }),
        }
    }

    pub fn to_request(&self) -> Result<UpdatePatientRequest, PatientError> {
        let nombres = self.nombres.trim();
        let apellidos = self.apellidos.trim();
        let correo = self.correo.trim().to_lowercase();

        if nombres.is_empty() {
            return Err(PatientError::MissingField("El nombre"));
        }
        if apellidos.is_empty() {
            return Err(PatientError::MissingField("El apellido"));
        }
        if correo.is_empty() {
            return Err(PatientError::MissingField("El correo"));
        }

        Ok(UpdatePatientRequest {
            nombres: nombres.to_string(),
            apellidos: apellidos.to_string(),
            telefono: self.telefono.as_deref().map(|t| t.trim().to_string()),
            correo,
            fecha_nacimiento: self
                .fecha_nacimiento
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSearchQuery {
    #[serde(default)]
    pub busqueda: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientList {
    pub pacientes: Vec<Patient>,
    pub puede_editar_historial: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSaved {
    pub paciente: Patient,
    pub historial: Option<ClinicalHistory>,
    pub mensaje: String,
}
