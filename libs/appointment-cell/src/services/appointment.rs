use anyhow::Result;
use serde_json::json;
use tracing::debug;

use patient_cell::Consultation;
use shared_backend::{query_string, BackendClient};

use crate::models::{
    Appointment, AppointmentFilter, AssignDoctorRequest, CreateInternalRequest, CreatePublicRequest,
    PublicCatalog, RegisterConsultationRequest,
};

/// `/api/Citas` endpoints. The public ones go out without the session cookie.
pub struct AppointmentService {
    backend: BackendClient,
}

impl AppointmentService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list_by_clinic(&self, clinic_id: i64, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments for clinic {} with {:?}", clinic_id, filter);
        let query = query_string(&[
            ("fechaDesde", filter.fecha_desde.clone()),
            ("fechaHasta", filter.fecha_hasta.clone()),
            ("idSucursal", filter.id_sucursal.filter(|id| *id > 0).map(|id| id.to_string())),
            ("estado", filter.estado.map(|s| s.code().to_string())),
        ]);
        let appointments = self
            .backend
            .get(
                &format!("/api/Citas/clinica/{}{}", clinic_id, query),
                "No se pudieron cargar las citas",
            )
            .await?;
        Ok(appointments)
    }

    pub async fn create_internal(&self, request: &CreateInternalRequest) -> Result<Appointment> {
        debug!(
            "Creating internal appointment for patient {} at branch {}",
            request.id_paciente, request.id_sucursal
        );
        let appointment = self
            .backend
            .post("/api/Citas/interna", json!(request), "No se pudo crear la cita")
            .await?;
        Ok(appointment)
    }

    pub async fn create_public(&self, request: &CreatePublicRequest) -> Result<Appointment> {
        debug!(
            "Creating public appointment at clinic {} branch {}",
            request.id_clinica, request.id_sucursal
        );
        let appointment = self
            .backend
            .anonymous()
            .post("/api/Citas/publica", json!(request), "No se pudo agendar la cita")
            .await?;
        Ok(appointment)
    }

    pub async fn public_catalog(&self, clinic_id: i64) -> Result<PublicCatalog> {
        debug!("Fetching public catalog for clinic {}", clinic_id);
        let catalog = self
            .backend
            .anonymous()
            .get(
                &format!("/api/Citas/publica/catalogo/{}", clinic_id),
                "No se pudo cargar el catálogo público",
            )
            .await?;
        Ok(catalog)
    }

    pub async fn assign_doctor(&self, appointment_id: i64, request: &AssignDoctorRequest) -> Result<Appointment> {
        debug!("Assigning doctor {:?} to appointment {}", request.id_doctor, appointment_id);
        let appointment = self
            .backend
            .put(
                &format!("/api/Citas/{}/doctor", appointment_id),
                json!(request),
                "No se pudo asignar el doctor",
            )
            .await?;
        Ok(appointment)
    }

    pub async fn register_consultation(
        &self,
        appointment_id: i64,
        request: &RegisterConsultationRequest,
    ) -> Result<Consultation> {
        debug!("Registering consultation for appointment {}", appointment_id);
        let consultation = self
            .backend
            .post(
                &format!("/api/Citas/{}/consulta", appointment_id),
                json!(request),
                "No se pudo registrar la consulta",
            )
            .await?;
        Ok(consultation)
    }
}
