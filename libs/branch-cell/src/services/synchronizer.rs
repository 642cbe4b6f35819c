//! Weekly schedule reconciliation.
//!
//! A branch keeps at most one schedule row per open weekday and none for a
//! closed one. Saving the editor compares the desired week with whatever rows
//! the server holds (which may include several rows for one day) and issues
//! the creates, updates, and deletes that bring the server in line.
//!
//! [`plan_week`] derives the operations without side effects;
//! [`ScheduleSynchronizer`] runs them in order against a [`ScheduleStore`]
//! and re-reads the server afterwards. There is no transaction: with
//! [`FailurePolicy::Abort`] the first failing call stops the run and the
//! operations already applied stay applied. Running the save again re-derives
//! the plan from server truth, so repeated saves converge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use shared_models::time::{to_time_input, with_seconds};

use crate::models::{
    CreateScheduleRequest, DayOfWeek, PersistedSchedule, UpdateScheduleRequest, WeeklyConfig,
    WeeklyDayConfig,
};
use crate::services::schedule::ScheduleStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tipo", rename_all = "lowercase")]
pub enum ScheduleOp {
    Create(CreateScheduleRequest),
    Update {
        id: i64,
        #[serde(flatten)]
        request: UpdateScheduleRequest,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub creados: u32,
    pub actualizados: u32,
    pub eliminados: u32,
}

impl SyncSummary {
    fn record(&mut self, op: &ScheduleOp) {
        match op {
            ScheduleOp::Create(_) => self.creados += 1,
            ScheduleOp::Update { .. } => self.actualizados += 1,
            ScheduleOp::Delete { .. } => self.eliminados += 1,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Configuración guardada. Creados: {}, actualizados: {}, eliminados: {}.",
            self.creados, self.actualizados, self.eliminados
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failed call.
    #[default]
    Abort,
    /// Attempt every call and report the failures together.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedOp {
    pub operacion: ScheduleOp,
    pub mensaje: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub aplicados: SyncSummary,
    pub fallidos: Vec<FailedOp>,
    /// Server rows after the run.
    pub horarios: Vec<PersistedSchedule>,
    /// Editor state rebuilt from `horarios`.
    pub configuracion: WeeklyConfig,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.fallidos.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Rango inválido en {day}. Verifica hora de inicio y fin.")]
    InvalidRange { day: String },

    /// An operation failed under [`FailurePolicy::Abort`].
    #[error("{message}")]
    Aborted {
        applied: SyncSummary,
        op: ScheduleOp,
        message: String,
    },

    /// The operations ran but the server state could not be re-read.
    #[error("{message}")]
    Refresh { applied: SyncSummary, message: String },
}

/// Checks the desired week before anything is sent.
pub fn validate_week(config: &WeeklyConfig) -> Result<(), ScheduleError> {
    match config.first_invalid_day() {
        Some(day) => Err(ScheduleError::InvalidRange {
            day: day.nombre.clone(),
        }),
        None => Ok(()),
    }
}

fn group_by_day(existing: &[PersistedSchedule]) -> BTreeMap<DayOfWeek, Vec<&PersistedSchedule>> {
    let mut by_day: BTreeMap<DayOfWeek, Vec<&PersistedSchedule>> = BTreeMap::new();
    for schedule in existing {
        match schedule.day() {
            Some(day) => by_day.entry(day).or_default().push(schedule),
            None => warn!(
                "Ignoring schedule {} with unknown day {}",
                schedule.id, schedule.dia_semana
            ),
        }
    }
    for rows in by_day.values_mut() {
        rows.sort_by_key(|s| s.id);
    }
    by_day
}

fn plan_day(branch_id: i64, desired: &WeeklyDayConfig, rows: &[&PersistedSchedule]) -> Vec<ScheduleOp> {
    if desired.cerrado {
        return rows.iter().map(|s| ScheduleOp::Delete { id: s.id }).collect();
    }

    let day = desired.dia_semana.number();
    let hora_inicio = with_seconds(&desired.hora_inicio);
    let hora_fin = with_seconds(&desired.hora_fin);

    let Some((canonical, duplicates)) = rows.split_first() else {
        return vec![ScheduleOp::Create(CreateScheduleRequest {
            id_sucursal: branch_id,
            dia_semana: day,
            hora_inicio,
            hora_fin,
        })];
    };

    let mut ops = Vec::new();
    let current_start = with_seconds(&to_time_input(canonical.hora_inicio.as_deref()));
    let current_end = with_seconds(&to_time_input(canonical.hora_fin.as_deref()));

    if current_start != hora_inicio || current_end != hora_fin {
        ops.push(ScheduleOp::Update {
            id: canonical.id,
            request: UpdateScheduleRequest {
                dia_semana: day,
                hora_inicio,
                hora_fin,
            },
        });
    }

    ops.extend(duplicates.iter().map(|s| ScheduleOp::Delete { id: s.id }));
    ops
}

/// Operations that turn `existing` into `config`, in day order.
///
/// Fails with [`ScheduleError::InvalidRange`] naming the first open day whose
/// range is empty or inverted.
pub fn plan_week(
    branch_id: i64,
    config: &WeeklyConfig,
    existing: &[PersistedSchedule],
) -> Result<Vec<ScheduleOp>, ScheduleError> {
    validate_week(config)?;

    let by_day = group_by_day(existing);
    let mut days: Vec<&WeeklyDayConfig> = config.days.iter().collect();
    days.sort_by_key(|d| d.dia_semana);

    let ops = days
        .into_iter()
        .flat_map(|desired| {
            let rows = by_day
                .get(&desired.dia_semana)
                .map(Vec::as_slice)
                .unwrap_or_default();
            plan_day(branch_id, desired, rows)
        })
        .collect();

    Ok(ops)
}

pub struct ScheduleSynchronizer<'a, S: ScheduleStore> {
    store: &'a S,
    policy: FailurePolicy,
}

impl<'a, S: ScheduleStore> ScheduleSynchronizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn apply(&self, op: &ScheduleOp) -> anyhow::Result<()> {
        match op {
            ScheduleOp::Create(request) => self.store.create_schedule(request).await,
            ScheduleOp::Update { id, request } => self.store.update_schedule(*id, request).await,
            ScheduleOp::Delete { id } => self.store.delete_schedule(*id).await,
        }
    }

    /// Reconciles the branch's rows with `config` and returns the new server
    /// state.
    pub async fn save(
        &self,
        branch_id: i64,
        config: &WeeklyConfig,
        existing: &[PersistedSchedule],
    ) -> Result<SyncReport, ScheduleError> {
        let ops = plan_week(branch_id, config, existing)?;
        debug!("Planned {} schedule operations for branch {}", ops.len(), branch_id);

        let mut applied = SyncSummary::default();
        let mut failed = Vec::new();

        for op in ops {
            match self.apply(&op).await {
                Ok(()) => applied.record(&op),
                Err(e) => {
                    let message = e.to_string();
                    warn!("Schedule operation {:?} failed: {}", op, message);

                    if self.policy == FailurePolicy::Abort {
                        return Err(ScheduleError::Aborted { applied, op, message });
                    }
                    failed.push(FailedOp {
                        operacion: op,
                        mensaje: message,
                    });
                }
            }
        }

        let horarios = self
            .store
            .list_schedules(branch_id)
            .await
            .map_err(|e| ScheduleError::Refresh {
                applied,
                message: e.to_string(),
            })?;

        info!(
            "Branch {} schedules saved: {} created, {} updated, {} deleted, {} failed",
            branch_id,
            applied.creados,
            applied.actualizados,
            applied.eliminados,
            failed.len()
        );

        Ok(SyncReport {
            aplicados: applied,
            fallidos: failed,
            configuracion: WeeklyConfig::from_schedules(&horarios),
            horarios,
        })
    }
}
