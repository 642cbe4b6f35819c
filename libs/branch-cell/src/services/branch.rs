use anyhow::Result;
use serde_json::json;
use tracing::debug;

use shared_backend::BackendClient;

use crate::models::{Branch, CreateBranchRequest};

/// `/Sucursales` endpoints.
pub struct BranchService {
    backend: BackendClient,
}

impl BranchService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn list_all(&self) -> Result<Vec<Branch>> {
        debug!("Fetching branches");
        let branches = self
            .backend
            .get("/Sucursales", "Error al obtener sucursales")
            .await?;
        Ok(branches)
    }

    /// The backend has no per-clinic listing; filter the full list.
    pub async fn list_by_clinic(&self, clinic_id: i64) -> Result<Vec<Branch>> {
        let branches = self.list_all().await?;
        Ok(branches
            .into_iter()
            .filter(|b| b.id_clinica == clinic_id)
            .collect())
    }

    pub async fn get(&self, branch_id: i64) -> Result<Branch> {
        debug!("Fetching branch {}", branch_id);
        let branch = self
            .backend
            .get(&format!("/Sucursales/{}", branch_id), "Error al obtener sucursal")
            .await?;
        Ok(branch)
    }

    pub async fn create(&self, request: &CreateBranchRequest) -> Result<Branch> {
        debug!("Creating branch {} for clinic {}", request.nombre, request.id_clinica);
        let branch = self
            .backend
            .post("/Sucursales", json!(request), "Error al crear sucursal")
            .await?;
        Ok(branch)
    }
}
