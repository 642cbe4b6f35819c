use thiserror::Error;
use tracing::{debug, info};

use shared_models::time::parse_date_prefix;

use crate::models::{CreateHolidayRequest, Holiday};
use crate::services::schedule::HolidayStore;

#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("La fecha del asueto es obligatoria")]
    MissingDate,

    #[error("Fecha inválida: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Branch closure dates. Independent of the weekly grid: a holiday on an
/// open weekday is not checked against it.
pub struct HolidayManager<'a, S: HolidayStore> {
    store: &'a S,
}

impl<'a, S: HolidayStore> HolidayManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list(&self, branch_id: i64) -> Result<Vec<Holiday>, HolidayError> {
        Ok(self.store.list_holidays(branch_id).await?)
    }

    /// Creates the holiday and returns the branch's refreshed list.
    pub async fn add(
        &self,
        branch_id: i64,
        date: &str,
        reason: Option<&str>,
    ) -> Result<Vec<Holiday>, HolidayError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(HolidayError::MissingDate);
        }
        let fecha = parse_date_prefix(date).ok_or_else(|| HolidayError::InvalidDate(date.to_string()))?;

        let motivo = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let request = CreateHolidayRequest {
            id_sucursal: branch_id,
            fecha: fecha.format("%Y-%m-%d").to_string(),
            motivo,
        };

        debug!("Adding holiday {} to branch {}", request.fecha, branch_id);
        self.store.create_holiday(&request).await?;
        info!("Holiday {} added to branch {}", request.fecha, branch_id);

        self.list(branch_id).await
    }

    pub async fn remove(&self, branch_id: i64, holiday_id: i64) -> Result<Vec<Holiday>, HolidayError> {
        debug!("Removing holiday {} from branch {}", holiday_id, branch_id);
        self.store.delete_holiday(holiday_id).await?;
        self.list(branch_id).await
    }
}
