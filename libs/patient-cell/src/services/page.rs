use anyhow::Result;
use tracing::info;

use shared_models::auth::Role;

use crate::models::{Patient, PatientList, PatientSaved, UpdateHistoryRequest, UpdatePatientRequest};
use crate::services::patient::PatientService;

pub const PATIENT_SAVED: &str = "Paciente actualizado correctamente";

/// Clinical history is written by clinical staff only.
pub fn can_edit_history(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Doctor)
}

/// Alphabetical by full name, ignoring case.
pub fn sort_by_name(patients: &mut [Patient]) {
    patients.sort_by_cached_key(|p| p.nombre_completo.to_lowercase());
}

pub struct PatientsPage {
    service: PatientService,
    role: Role,
}

impl PatientsPage {
    pub fn new(service: PatientService, role: Role) -> Self {
        Self { service, role }
    }

    pub async fn list(&self, clinic_id: i64, search: Option<&str>) -> Result<PatientList> {
        let mut pacientes = self.service.list_by_clinic(clinic_id, search).await?;
        sort_by_name(&mut pacientes);

        Ok(PatientList {
            pacientes,
            puede_editar_historial: can_edit_history(self.role),
        })
    }

    /// Updates the patient, then the history when the role allows it. A
    /// history sent by other roles is ignored.
    pub async fn save(
        &self,
        patient_id: i64,
        request: &UpdatePatientRequest,
        history: Option<&UpdateHistoryRequest>,
    ) -> Result<PatientSaved> {
        let paciente = self.service.update(patient_id, request).await?;

        let historial = match history {
            Some(history) if can_edit_history(self.role) => Some(
                self.service
                    .save_history(patient_id, &history.trimmed())
                    .await?,
            ),
            _ => None,
        };

        info!("Patient {} updated", patient_id);
        Ok(PatientSaved {
            paciente,
            historial,
            mensaje: PATIENT_SAVED.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(name: &str) -> Patient {
        Patient {
            nombre_completo: name.to_string(),
            ..Patient::default()
        }
    }

    #[test]
    fn test_sort_ignores_case() {
        let mut patients = vec![patient("carlos Ruiz"), patient("Beatriz Paz"), patient("Ana Gómez")];
        sort_by_name(&mut patients);

        let names: Vec<&str> = patients.iter().map(|p| p.nombre_completo.as_str()).collect();
        assert_eq!(names, vec!["Ana Gómez", "Beatriz Paz", "carlos Ruiz"]);
    }

    #[test]
    fn test_history_roles() {
        assert!(can_edit_history(Role::Admin));
        assert!(can_edit_history(Role::Doctor));
        assert!(!can_edit_history(Role::Receptionist));
        assert!(!can_edit_history(Role::Unknown));
    }
}
