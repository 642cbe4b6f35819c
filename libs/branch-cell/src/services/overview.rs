use anyhow::Result;
use futures::future::join_all;
use tracing::warn;

use shared_models::time::to_time_input;

use crate::models::{Branch, BranchOverview, DayOfWeek, Holiday, PersistedSchedule};
use crate::services::branch::BranchService;
use crate::services::schedule::{HolidayStore, ScheduleStore};

/// "Lunes a Viernes · 08:00 - 17:00", or a placeholder when empty. The time
/// range is taken from the first row as returned by the server.
pub fn schedule_summary(schedules: &[PersistedSchedule]) -> String {
    let Some(reference) = schedules.first() else {
        return "Sin horarios configurados".to_string();
    };

    let mut days: Vec<Option<DayOfWeek>> = schedules.iter().map(PersistedSchedule::day).collect();
    days.sort();

    let name = |day: Option<&Option<DayOfWeek>>| match day {
        Some(Some(day)) => day.name(),
        _ => "Día",
    };

    format!(
        "{} a {} · {} - {}",
        name(days.first()),
        name(days.last()),
        to_time_input(reference.hora_inicio.as_deref()),
        to_time_input(reference.hora_fin.as_deref())
    )
}

pub fn holiday_summary(holidays: &[Holiday]) -> String {
    if holidays.is_empty() {
        "Sin asuetos registrados".to_string()
    } else {
        format!("{} asueto(s) configurado(s)", holidays.len())
    }
}

async fn branch_card<S>(store: &S, branch: Branch) -> BranchOverview
where
    S: ScheduleStore + HolidayStore,
{
    let (schedules, holidays) = tokio::join!(
        store.list_schedules(branch.id),
        store.list_holidays(branch.id)
    );

    // A failing branch still gets a card, just an empty one.
    let horarios = schedules.unwrap_or_else(|e| {
        warn!("Schedules unavailable for branch {}: {}", branch.id, e);
        Vec::new()
    });
    let asuetos = holidays.unwrap_or_else(|e| {
        warn!("Holidays unavailable for branch {}: {}", branch.id, e);
        Vec::new()
    });

    BranchOverview {
        resumen_horario: schedule_summary(&horarios),
        resumen_asuetos: holiday_summary(&asuetos),
        sucursal: branch,
        horarios,
        asuetos,
    }
}

/// Every branch of the clinic with its schedules and holidays, fetched
/// concurrently.
pub async fn load_overview<S>(
    branches: &BranchService,
    store: &S,
    clinic_id: i64,
) -> Result<Vec<BranchOverview>>
where
    S: ScheduleStore + HolidayStore,
{
    let list = branches.list_by_clinic(clinic_id).await?;
    let cards = join_all(list.into_iter().map(|branch| branch_card(store, branch))).await;
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: i64, day: i64, start: &str, end: &str) -> PersistedSchedule {
        PersistedSchedule {
            id,
            id_sucursal: 1,
            dia_semana: day,
            hora_inicio: Some(start.to_string()),
            hora_fin: Some(end.to_string()),
        }
    }

    #[test]
    fn test_empty_summaries() {
        assert_eq!(schedule_summary(&[]), "Sin horarios configurados");
        assert_eq!(holiday_summary(&[]), "Sin asuetos registrados");
    }

    #[test]
    fn test_schedule_summary_spans_first_to_last_day() {
        let rows = vec![
            row(3, 5, "09:00:00", "18:00:00"),
            row(1, 1, "08:00:00", "17:00:00"),
            row(2, 3, "08:00:00", "17:00:00"),
        ];
        assert_eq!(schedule_summary(&rows), "Lunes a Viernes · 09:00 - 18:00");
    }

    #[test]
    fn test_schedule_summary_treats_zero_as_sunday() {
        let rows = vec![row(1, 0, "10:00:00", "14:00:00"), row(2, 6, "10:00:00", "14:00:00")];
        assert_eq!(schedule_summary(&rows), "Sábado a Domingo · 10:00 - 14:00");
    }

    #[test]
    fn test_holiday_summary_counts() {
        let holidays = vec![Holiday {
            id: 1,
            id_sucursal: 1,
            fecha: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            motivo: None,
        }];
        assert_eq!(holiday_summary(&holidays), "1 asueto(s) configurado(s)");
    }
}
