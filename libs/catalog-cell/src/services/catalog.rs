use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_backend::{query_string, BackendClient};

use crate::models::{CreateServiceRequest, ServiceOffering, UpdateServiceRequest};

/// `/api/Servicios` endpoints.
pub struct CatalogService {
    backend: BackendClient,
}

impl CatalogService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list_by_clinic(
        &self,
        clinic_id: i64,
        name: Option<&str>,
        include_inactive: bool,
    ) -> Result<Vec<ServiceOffering>> {
        debug!(
            "Fetching services for clinic {} (inactive included: {})",
            clinic_id, include_inactive
        );
        let query = query_string(&[
            ("nombre", name.map(|n| n.trim().to_string())),
            ("incluirInactivos", include_inactive.then(|| "true".to_string())),
        ]);
        let services = self
            .backend
            .get(
                &format!("/api/Servicios/clinica/{}{}", clinic_id, query),
                "Error al obtener servicios",
            )
            .await?;
        Ok(services)
    }

    /// Active services only, as offered when booking.
    pub async fn list_active(&self, clinic_id: i64) -> Result<Vec<ServiceOffering>> {
        let services = self.list_by_clinic(clinic_id, None, false).await?;
        Ok(services.into_iter().filter(|s| s.activo).collect())
    }

    pub async fn create(&self, request: &CreateServiceRequest) -> Result<ServiceOffering> {
        debug!("Creating service {} for clinic {}", request.nombre_servicio, request.id_clinica);
        let service = self
            .backend
            .post("/api/Servicios", json!(request), "Error al crear servicio")
            .await?;
        Ok(service)
    }

    pub async fn update(&self, service_id: i64, request: &UpdateServiceRequest) -> Result<ServiceOffering> {
        debug!("Updating service {}", service_id);
        let service = self
            .backend
            .put(
                &format!("/api/Servicios/{}", service_id),
                json!(request),
                "Error al actualizar servicio",
            )
            .await?;
        Ok(service)
    }

    pub async fn deactivate(&self, service_id: i64) -> Result<()> {
        debug!("Deactivating service {}", service_id);
        self.backend
            .delete(
                &format!("/api/Servicios/{}", service_id),
                "Error al desactivar servicio",
            )
            .await?;
        Ok(())
    }
}
