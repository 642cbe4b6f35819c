use anyhow::Result;
use tracing::info;

use branch_cell::BranchService;

use crate::models::{
    ClinicView, CreateServiceRequest, ServiceFilter, ServiceList, ServiceMutation, ServiceOffering,
    UpdateServiceRequest,
};
use crate::services::catalog::CatalogService;
use crate::services::clinic::ClinicService;

/// The table shows either the active or the inactive services, never both.
pub fn visible_services(services: Vec<ServiceOffering>, show_inactive: bool) -> Vec<ServiceOffering> {
    services
        .into_iter()
        .filter(|s| s.activo != show_inactive)
        .collect()
}

pub struct ServicesPage {
    catalog: CatalogService,
}

impl ServicesPage {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    pub async fn list(&self, clinic_id: i64, filter: &ServiceFilter) -> Result<ServiceList> {
        let services = self
            .catalog
            .list_by_clinic(clinic_id, filter.nombre.as_deref(), filter.inactivos)
            .await?;

        Ok(ServiceList {
            servicios: visible_services(services, filter.inactivos),
            inactivos: filter.inactivos,
        })
    }

    pub async fn create(&self, request: &CreateServiceRequest) -> Result<ServiceMutation> {
        let service = self.catalog.create(request).await?;
        info!("Service {} created", service.id);
        Ok(ServiceMutation {
            servicio: Some(service),
            mensaje: "Servicio creado correctamente.".to_string(),
        })
    }

    pub async fn update(&self, service_id: i64, request: &UpdateServiceRequest) -> Result<ServiceMutation> {
        let service = self.catalog.update(service_id, request).await?;
        Ok(ServiceMutation {
            servicio: Some(service),
            mensaje: "Servicio actualizado correctamente.".to_string(),
        })
    }

    pub async fn deactivate(&self, service_id: i64) -> Result<ServiceMutation> {
        self.catalog.deactivate(service_id).await?;
        info!("Service {} deactivated", service_id);
        Ok(ServiceMutation {
            servicio: None,
            mensaje: "Servicio desactivado.".to_string(),
        })
    }

    pub async fn reactivate(&self, service_id: i64) -> Result<ServiceMutation> {
        let service = self
            .catalog
            .update(service_id, &UpdateServiceRequest::reactivate())
            .await?;
        Ok(ServiceMutation {
            servicio: Some(service),
            mensaje: "Servicio reactivado.".to_string(),
        })
    }
}

/// Clinic and branches are fetched together.
pub async fn load_clinic(
    clinics: &ClinicService,
    branches: &BranchService,
    clinic_id: i64,
) -> Result<ClinicView> {
    let (clinica, sucursales) = tokio::try_join!(
        clinics.get(clinic_id),
        branches.list_by_clinic(clinic_id)
    )?;
    Ok(ClinicView { clinica, sucursales })
}
