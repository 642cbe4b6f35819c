use anyhow::Result;
use serde::Serialize;
use tracing::info;

use branch_cell::{Branch, BranchService};
use shared_models::auth::Role;

use crate::models::{
    CreateWorkerRequest, Page, UpdateWorkerRequest, Worker, WorkerFilter, WorkerMutation,
};
use crate::services::worker::WorkerService;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkersView {
    pub sucursales: Vec<Branch>,
    /// Preselected branch of the create dialog.
    pub sucursal_por_defecto: Option<i64>,
    pub trabajadores: Page<Worker>,
}

/// Admins are never listed; the optional role filter narrows the rest.
pub fn visible_workers(workers: Vec<Worker>, role: Option<Role>) -> Vec<Worker> {
    workers
        .into_iter()
        .filter(|w| w.rol != Role::Admin)
        .filter(|w| role.map_or(true, |r| w.rol == r))
        .collect()
}

pub struct WorkersPage {
    workers: WorkerService,
    branches: BranchService,
}

impl WorkersPage {
    pub fn new(workers: WorkerService, branches: BranchService) -> Self {
        Self { workers, branches }
    }

    async fn fetch(&self, clinic_id: i64, filter: &WorkerFilter) -> Result<Vec<Worker>> {
        let name = filter.name();
        if filter.inactivos {
            return self.workers.list_inactive(clinic_id, filter.branch(), name).await;
        }
        match filter.branch() {
            Some(branch_id) => self.workers.list_by_branch(clinic_id, branch_id, name).await,
            None => self.workers.list_by_clinic(clinic_id, name).await,
        }
    }

    pub async fn load(&self, clinic_id: i64, filter: &WorkerFilter) -> Result<WorkersView> {
        let (sucursales, workers) = tokio::try_join!(
            self.branches.list_by_clinic(clinic_id),
            self.fetch(clinic_id, filter)
        )?;

        let visible = visible_workers(workers, filter.role());
        Ok(WorkersView {
            sucursal_por_defecto: sucursales.first().map(|b| b.id),
            trabajadores: Page::of(&visible, filter.pagina, filter.tamano),
            sucursales,
        })
    }

    pub async fn create(&self, request: &CreateWorkerRequest) -> Result<WorkerMutation> {
        let worker = self.workers.create(request).await?;
        info!("Worker {} created in branch {}", worker.id, request.id_sucursal);
        Ok(WorkerMutation {
            trabajador: Some(worker),
            mensaje: "Trabajador creado. Se envió contraseña temporal al correo.".to_string(),
        })
    }

    pub async fn update(&self, worker_id: i64, request: &UpdateWorkerRequest) -> Result<WorkerMutation> {
        let worker = self.workers.update(worker_id, request).await?;
        Ok(WorkerMutation {
            trabajador: Some(worker),
            mensaje: "Trabajador actualizado correctamente.".to_string(),
        })
    }

    pub async fn deactivate(&self, worker_id: i64) -> Result<WorkerMutation> {
        self.workers.deactivate(worker_id).await?;
        info!("Worker {} deactivated", worker_id);
        Ok(WorkerMutation {
            trabajador: None,
            mensaje: "Trabajador desactivado correctamente.".to_string(),
        })
    }

    pub async fn reactivate(&self, worker_id: i64) -> Result<WorkerMutation> {
        let worker = self
            .workers
            .update(worker_id, &UpdateWorkerRequest::reactivate())
            .await?;
        info!("Worker {} reactivated", worker_id);
        Ok(WorkerMutation {
            trabajador: Some(worker),
            mensaje: "Trabajador reactivado correctamente.".to_string(),
        })
    }
}
