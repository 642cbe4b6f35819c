use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use shared_models::status::PageStatus;

use crate::models::{DayChanges, Holiday, PersistedSchedule, WeeklyConfig};
use crate::services::holiday::{HolidayError, HolidayManager};
use crate::services::schedule::{HolidayStore, ScheduleStore};
use crate::services::synchronizer::{FailurePolicy, ScheduleError, ScheduleSynchronizer, SyncReport};

pub const LOAD_ERROR: &str = "No se pudieron cargar horarios";

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Solo un administrador puede modificar horarios")]
    ReadOnly,

    /// The initial load failed, so there is no server state to diff against.
    #[error("No se pudieron cargar horarios")]
    Unavailable,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Holiday(#[from] HolidayError),
}

/// Snapshot returned to the dashboard after each editor action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub id_sucursal: i64,
    pub puede_editar: bool,
    pub configuracion: WeeklyConfig,
    pub horarios: Vec<PersistedSchedule>,
    pub asuetos: Vec<Holiday>,
    pub estado: PageStatus,
}

/// Schedule dialog of one branch: the weekly grid being edited plus its
/// holidays.
pub struct ScheduleEditor<'a, S> {
    store: &'a S,
    branch_id: i64,
    can_manage: bool,
    loaded: bool,
    pub schedules: Vec<PersistedSchedule>,
    pub holidays: Vec<Holiday>,
    pub config: WeeklyConfig,
    pub status: PageStatus,
}

impl<'a, S> ScheduleEditor<'a, S>
where
    S: ScheduleStore + HolidayStore,
{
    /// Loads schedules and holidays together. A failed load leaves the
    /// default week in place and records the error banner.
    pub async fn open(store: &'a S, branch_id: i64, can_manage: bool) -> Self {
        let mut editor = Self {
            store,
            branch_id,
            can_manage,
            loaded: false,
            schedules: Vec::new(),
            holidays: Vec::new(),
            config: WeeklyConfig::default(),
            status: PageStatus::default(),
        };

        match tokio::try_join!(store.list_schedules(branch_id), store.list_holidays(branch_id)) {
            Ok((schedules, holidays)) => {
                debug!(
                    "Editor for branch {} loaded {} schedules and {} holidays",
                    branch_id,
                    schedules.len(),
                    holidays.len()
                );
                editor.config = WeeklyConfig::from_schedules(&schedules);
                editor.schedules = schedules;
                editor.holidays = holidays;
                editor.loaded = true;
            }
            Err(e) => {
                warn!("Could not load schedules for branch {}: {}", branch_id, e);
                editor.status.set_error(LOAD_ERROR);
            }
        }

        editor
    }

    pub fn branch_id(&self) -> i64 {
        self.branch_id
    }

    pub fn update_day(&mut self, changes: DayChanges) {
        self.config.update_day(changes);
    }

    fn ensure_manageable(&mut self) -> Result<(), EditorError> {
        if !self.can_manage {
            let err = EditorError::ReadOnly;
            self.status.fail(err.to_string());
            return Err(err);
        }
        Ok(())
    }

    /// Runs the synchronizer and adopts the server state it returns.
    pub async fn save(&mut self, policy: FailurePolicy) -> Result<SyncReport, EditorError> {
        self.ensure_manageable()?;
        if !self.loaded {
            self.status.fail(LOAD_ERROR);
            return Err(EditorError::Unavailable);
        }
        self.status.begin();

        let result = ScheduleSynchronizer::new(self.store)
            .with_policy(policy)
            .save(self.branch_id, &self.config, &self.schedules)
            .await;

        match result {
            Ok(report) => {
                self.schedules = report.horarios.clone();
                self.config = report.configuracion.clone();

                if report.is_complete() {
                    self.status.succeed(report.aplicados.message());
                } else {
                    self.status.warn(format!(
                        "{} {} operación(es) fallaron.",
                        report.aplicados.message(),
                        report.fallidos.len()
                    ));
                }
                Ok(report)
            }
            Err(e) => {
                self.status.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn add_holiday(&mut self, date: &str, reason: Option<&str>) -> Result<(), EditorError> {
        self.ensure_manageable()?;
        self.status.begin();

        match HolidayManager::new(self.store).add(self.branch_id, date, reason).await {
            Ok(holidays) => {
                self.holidays = holidays;
                self.status.succeed("Asueto agregado correctamente.");
                Ok(())
            }
            Err(e) => {
                self.status.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn remove_holiday(&mut self, holiday_id: i64) -> Result<(), EditorError> {
        self.ensure_manageable()?;
        self.status.begin();

        match HolidayManager::new(self.store)
            .remove(self.branch_id, holiday_id)
            .await
        {
            Ok(holidays) => {
                self.holidays = holidays;
                self.status.succeed("Asueto eliminado correctamente.");
                Ok(())
            }
            Err(e) => {
                self.status.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            id_sucursal: self.branch_id,
            puede_editar: self.can_manage,
            configuracion: self.config.clone(),
            horarios: self.schedules.clone(),
            asuetos: self.holidays.clone(),
            estado: self.status.clone(),
        }
    }
}
