use std::fmt;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use shared_models::time::{lenient_date, to_time_input};

pub const DAY_NAMES: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

pub const DEFAULT_OPEN_TIME: &str = "08:00";
pub const DEFAULT_CLOSE_TIME: &str = "17:00";

/// ISO day of week, Monday = 1 through Sunday = 7.
///
/// The backend may send Sunday as `0`; [`DayOfWeek::from_backend`] folds it
/// into `7` so both spellings group together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const MONDAY: DayOfWeek = DayOfWeek(1);
    pub const SUNDAY: DayOfWeek = DayOfWeek(7);

    pub fn new(day: u8) -> Option<Self> {
        (1..=7).contains(&day).then_some(Self(day))
    }

    pub fn from_backend(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::SUNDAY),
            1..=7 => Some(Self(raw as u8)),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = DayOfWeek> {
        (1..=7).map(DayOfWeek)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[usize::from(self.0 - 1)]
    }

    pub fn is_weekend(self) -> bool {
        self.0 >= 6
    }
}

impl Default for DayOfWeek {
    fn default() -> Self {
        Self::MONDAY
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        DayOfWeek::from_backend(raw)
            .ok_or_else(|| de::Error::custom(format!("invalid day of week: {}", raw)))
    }
}

/// Editable state of one weekday in the schedule dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDayConfig {
    pub dia_semana: DayOfWeek,
    pub nombre: String,
    pub cerrado: bool,
    pub hora_inicio: String,
    pub hora_fin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horario_id: Option<i64>,
}

impl WeeklyDayConfig {
    /// Monday to Friday open 08:00-17:00, weekend closed.
    pub fn default_for(day: DayOfWeek) -> Self {
        Self {
            dia_semana: day,
            nombre: day.name().to_string(),
            cerrado: day.is_weekend(),
            hora_inicio: DEFAULT_OPEN_TIME.to_string(),
            hora_fin: DEFAULT_CLOSE_TIME.to_string(),
            horario_id: None,
        }
    }

    /// Open days need both times and start strictly before end.
    pub fn has_valid_range(&self) -> bool {
        self.cerrado
            || (!self.hora_inicio.is_empty()
                && !self.hora_fin.is_empty()
                && self.hora_inicio < self.hora_fin)
    }
}

/// Partial edit of one day, applied on top of the current configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayChanges {
    pub dia_semana: DayOfWeek,
    #[serde(default)]
    pub cerrado: Option<bool>,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    #[serde(default)]
    pub hora_fin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyConfig {
    pub days: Vec<WeeklyDayConfig>,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            days: DayOfWeek::all().map(WeeklyDayConfig::default_for).collect(),
        }
    }
}

impl WeeklyConfig {
    /// Rebuilds the editor state from server rows. A day with rows is open
    /// and shows its canonical (lowest id) row; missing times read as 08:00.
    pub fn from_schedules(schedules: &[PersistedSchedule]) -> Self {
        let days = DayOfWeek::all()
            .map(|day| {
                let canonical = schedules
                    .iter()
                    .filter(|s| s.day() == Some(day))
                    .min_by_key(|s| s.id);

                match canonical {
                    Some(schedule) => WeeklyDayConfig {
                        cerrado: false,
                        hora_inicio: to_time_input(schedule.hora_inicio.as_deref()),
                        hora_fin: to_time_input(schedule.hora_fin.as_deref()),
                        horario_id: Some(schedule.id),
                        ..WeeklyDayConfig::default_for(day)
                    },
                    None => WeeklyDayConfig::default_for(day),
                }
            })
            .collect();

        Self { days }
    }

    pub fn day(&self, day: DayOfWeek) -> Option<&WeeklyDayConfig> {
        self.days.iter().find(|d| d.dia_semana == day)
    }

    pub fn update_day(&mut self, changes: DayChanges) {
        if let Some(day) = self.days.iter_mut().find(|d| d.dia_semana == changes.dia_semana) {
            if let Some(cerrado) = changes.cerrado {
                day.cerrado = cerrado;
            }
            if let Some(inicio) = changes.hora_inicio {
                day.hora_inicio = inicio;
            }
            if let Some(fin) = changes.hora_fin {
                day.hora_fin = fin;
            }
        }
    }

    /// First open day, in day order, whose range is unusable.
    pub fn first_invalid_day(&self) -> Option<&WeeklyDayConfig> {
        let mut days: Vec<&WeeklyDayConfig> = self.days.iter().collect();
        days.sort_by_key(|d| d.dia_semana);
        days.into_iter().find(|d| !d.has_valid_range())
    }
}

/// Weekly schedule row as stored by the backend ("horario").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSchedule {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdSucursal")]
    pub id_sucursal: i64,
    #[serde(alias = "DiaSemana")]
    pub dia_semana: i64,
    #[serde(default, alias = "HoraInicio")]
    pub hora_inicio: Option<String>,
    #[serde(default, alias = "HoraFin")]
    pub hora_fin: Option<String>,
}

impl PersistedSchedule {
    pub fn day(&self) -> Option<DayOfWeek> {
        DayOfWeek::from_backend(self.dia_semana)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub id_sucursal: i64,
    pub dia_semana: u8,
    pub hora_inicio: String,
    pub hora_fin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub dia_semana: u8,
    pub hora_inicio: String,
    pub hora_fin: String,
}

/// Branch closure date ("asueto").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdSucursal")]
    pub id_sucursal: i64,
    #[serde(alias = "Fecha", with = "lenient_date")]
    pub fecha: NaiveDate,
    #[serde(default, alias = "Motivo")]
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHolidayRequest {
    pub id_sucursal: i64,
    pub fecha: String,
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HolidayForm {
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "Nombre")]
    pub nombre: String,
    #[serde(default, alias = "Direccion")]
    pub direccion: String,
    #[serde(default, alias = "Activa")]
    pub activa: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    pub id_clinica: i64,
    pub nombre: String,
    pub direccion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub direccion: String,
}

impl BranchForm {
    /// Trimmed payload, or `None` when the name is blank.
    pub fn to_request(&self, clinic_id: i64) -> Option<CreateBranchRequest> {
        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            return None;
        }
        Some(CreateBranchRequest {
            id_clinica: clinic_id,
            nombre: nombre.to_string(),
            direccion: self.direccion.trim().to_string(),
        })
    }
}

/// Branch card: the branch plus its schedule and holiday summaries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchOverview {
    pub sucursal: Branch,
    pub resumen_horario: String,
    pub resumen_asuetos: String,
    pub horarios: Vec<PersistedSchedule>,
    pub asuetos: Vec<Holiday>,
}
