use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_backend::BackendClient;

use crate::models::{Clinic, CreateClinicRequest};

/// `/Clinicas` endpoints.
pub struct ClinicService {
    backend: BackendClient,
}

impl ClinicService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list_all(&self) -> Result<Vec<Clinic>> {
        debug!("Fetching clinics");
        let clinics = self.backend.get("/Clinicas", "Error al obtener clínicas").await?;
        Ok(clinics)
    }

    pub async fn get(&self, clinic_id: i64) -> Result<Clinic> {
        debug!("Fetching clinic {}", clinic_id);
        let clinic = self
            .backend
            .get(&format!("/Clinicas/{}", clinic_id), "Error al obtener la clínica")
            .await?;
        Ok(clinic)
    }

    pub async fn create(&self, request: &CreateClinicRequest) -> Result<Clinic> {
        debug!("Creating clinic {}", request.nombre);
        let clinic = self
            .backend
            .post("/Clinicas", json!(request), "Error al crear clínica")
            .await?;
        Ok(clinic)
    }
}
