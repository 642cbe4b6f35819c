use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_backend::{query_string, BackendClient};

use crate::models::{ClinicalHistory, Patient, UpdateHistoryRequest, UpdatePatientRequest};

/// `/api/Pacientes` endpoints.
pub struct PatientService {
    backend: BackendClient,
}

impl PatientService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Patients of a clinic, optionally narrowed by a free-text search.
    pub async fn list_by_clinic(&self, clinic_id: i64, search: Option<&str>) -> Result<Vec<Patient>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        debug!("Fetching patients for clinic {} (search: {:?})", clinic_id, search);

        let path = format!(
            "/api/Pacientes/clinica/{}{}",
            clinic_id,
            query_string(&[("busqueda", search.map(str::to_string))])
        );
        let patients = self
            .backend
            .get(&path, "No se pudieron cargar los pacientes")
            .await?;
        Ok(patients)
    }

    pub async fn update(&self, patient_id: i64, request: &UpdatePatientRequest) -> Result<Patient> {
        debug!("Updating patient {}", patient_id);
        let patient = self
            .backend
            .put(
                &format!("/api/Pacientes/{}", patient_id),
                json!(request),
                "No se pudo actualizar el paciente",
            )
            .await?;
        Ok(patient)
    }

    pub async fn save_history(
        &self,
        patient_id: i64,
        request: &UpdateHistoryRequest,
    ) -> Result<ClinicalHistory> {
        debug!("Saving clinical history of patient {}", patient_id);
        let history = self
            .backend
            .put(
                &format!("/api/Pacientes/{}/historial", patient_id),
                json!(request),
                "No se pudo guardar el historial clínico",
            )
            .await?;
        Ok(history)
    }
}
