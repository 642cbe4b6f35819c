use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_backend::BackendClient;

use crate::models::{
    CreateHolidayRequest, CreateScheduleRequest, Holiday, PersistedSchedule, UpdateScheduleRequest,
};

/// Remote weekly schedule rows of a branch.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_schedules(&self, branch_id: i64) -> Result<Vec<PersistedSchedule>>;
    async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<()>;
    async fn update_schedule(&self, schedule_id: i64, request: &UpdateScheduleRequest) -> Result<()>;
    async fn delete_schedule(&self, schedule_id: i64) -> Result<()>;
}

#[async_trait]
pub trait HolidayStore: Send + Sync {
    async fn list_holidays(&self, branch_id: i64) -> Result<Vec<Holiday>>;
    async fn create_holiday(&self, request: &CreateHolidayRequest) -> Result<()>;
    async fn delete_holiday(&self, holiday_id: i64) -> Result<()>;
}

/// `/HorariosSucursal` endpoints.
pub struct ScheduleService {
    backend: BackendClient,
}

impl ScheduleService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleService {
    async fn list_schedules(&self, branch_id: i64) -> Result<Vec<PersistedSchedule>> {
        debug!("Fetching schedules for branch {}", branch_id);
        let schedules = self
            .backend
            .get(
                &format!("/HorariosSucursal/sucursal/{}", branch_id),
                "Error al obtener horarios de la sucursal",
            )
            .await?;
        Ok(schedules)
    }

    async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<()> {
        debug!(
            "Creating schedule for branch {} on day {}",
            request.id_sucursal, request.dia_semana
        );
        self.backend
            .request_empty(
                Method::POST,
                "/HorariosSucursal",
                Some(json!(request)),
                "Error al crear horario",
            )
            .await?;
        Ok(())
    }

    async fn update_schedule(&self, schedule_id: i64, request: &UpdateScheduleRequest) -> Result<()> {
        debug!("Updating schedule {}", schedule_id);
        self.backend
            .request_empty(
                Method::PUT,
                &format!("/HorariosSucursal/{}", schedule_id),
                Some(json!(request)),
                "Error al actualizar horario",
            )
            .await?;
        Ok(())
    }

    async fn delete_schedule(&self, schedule_id: i64) -> Result<()> {
        debug!("Deleting schedule {}", schedule_id);
        self.backend
            .delete(
                &format!("/HorariosSucursal/{}", schedule_id),
                "Error al eliminar horario",
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HolidayStore for ScheduleService {
    async fn list_holidays(&self, branch_id: i64) -> Result<Vec<Holiday>> {
        debug!("Fetching holidays for branch {}", branch_id);
        let holidays = self
            .backend
            .get(
                &format!("/HorariosSucursal/sucursal/{}/asuetos", branch_id),
                "Error al obtener asuetos de la sucursal",
            )
            .await?;
        Ok(holidays)
    }

    async fn create_holiday(&self, request: &CreateHolidayRequest) -> Result<()> {
        debug!("Creating holiday {} for branch {}", request.fecha, request.id_sucursal);
        self.backend
            .request_empty(
                Method::POST,
                "/HorariosSucursal/asuetos",
                Some(json!(request)),
                "Error al crear asueto",
            )
            .await?;
        Ok(())
    }

    async fn delete_holiday(&self, holiday_id: i64) -> Result<()> {
        debug!("Deleting holiday {}", holiday_id);
        self.backend
            .delete(
                &format!("/HorariosSucursal/asuetos/{}", holiday_id),
                "Error al eliminar asueto",
            )
            .await?;
        Ok(())
    }
}
