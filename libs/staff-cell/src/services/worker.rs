use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_backend::{query_string, BackendClient};

use crate::models::{CreateWorkerRequest, UpdateWorkerRequest, Worker};

/// `/api/Usuarios` endpoints.
pub struct WorkerService {
    backend: BackendClient,
}

impl WorkerService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    fn name_query(name: Option<&str>) -> String {
        query_string(&[("nombre", name.map(|n| n.trim().to_string()))])
    }

    pub async fn list_by_clinic(&self, clinic_id: i64, name: Option<&str>) -> Result<Vec<Worker>> {
        debug!("Fetching workers for clinic {}", clinic_id);
        let path = format!("/api/Usuarios/clinica/{}{}", clinic_id, Self::name_query(name));
        let workers = self.backend.get(&path, "Error al obtener trabajadores").await?;
        Ok(workers)
    }

    pub async fn list_by_branch(
        &self,
        clinic_id: i64,
        branch_id: i64,
        name: Option<&str>,
    ) -> Result<Vec<Worker>> {
        debug!("Fetching workers for clinic {} branch {}", clinic_id, branch_id);
        let path = format!(
            "/api/Usuarios/clinica/{}/sucursal/{}{}",
            clinic_id,
            branch_id,
            Self::name_query(name)
        );
        let workers = self
            .backend
            .get(&path, "Error al obtener trabajadores por sucursal")
            .await?;
        Ok(workers)
    }

    pub async fn list_inactive(
        &self,
        clinic_id: i64,
        branch_id: Option<i64>,
        name: Option<&str>,
    ) -> Result<Vec<Worker>> {
        debug!("Fetching inactive workers for clinic {}", clinic_id);
        let query = query_string(&[
            ("idSucursal", branch_id.filter(|id| *id > 0).map(|id| id.to_string())),
            ("nombre", name.map(|n| n.trim().to_string())),
        ]);
        let path = format!("/api/Usuarios/clinica/{}/inactivos{}", clinic_id, query);
        let workers = self
            .backend
            .get(&path, "Error al obtener trabajadores inactivos")
            .await?;
        Ok(workers)
    }

    pub async fn create(&self, request: &CreateWorkerRequest) -> Result<Worker> {
        debug!("Creating worker {}", request.correo);
        let worker = self
            .backend
            .post("/api/Usuarios", json!(request), "Error al crear trabajador")
            .await?;
        Ok(worker)
    }

    pub async fn update(&self, worker_id: i64, request: &UpdateWorkerRequest) -> Result<Worker> {
        debug!("Updating worker {}", worker_id);
        let worker = self
            .backend
            .put(
                &format!("/api/Usuarios/{}", worker_id),
                json!(request),
                "Error al actualizar trabajador",
            )
            .await?;
        Ok(worker)
    }

    /// Soft delete: the backend marks the worker inactive.
    pub async fn deactivate(&self, worker_id: i64) -> Result<()> {
        debug!("Deactivating worker {}", worker_id);
        self.backend
            .delete(
                &format!("/api/Usuarios/{}", worker_id),
                "Error al eliminar trabajador",
            )
            .await?;
        Ok(())
    }
}
