use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use branch_cell::{Branch, BranchService};
use catalog_cell::{CatalogService, ServiceOffering};
use patient_cell::{Consultation, Patient, PatientService};
use shared_backend::BackendClient;
use shared_models::auth::{Role, UserProfile};
use shared_models::status::PageStatus;
use staff_cell::{Worker, WorkerService};

use crate::models::{
    Appointment, AppointmentError, AppointmentFilter, AssignDoctorRequest, ConsultationForm,
    InternalAppointmentForm,
};
use crate::services::appointment::AppointmentService;

pub const APPOINTMENT_CREATED: &str = "Cita interna creada correctamente";
pub const DOCTOR_ASSIGNED: &str = "Doctor asignado correctamente";
pub const CONSULTATION_REGISTERED: &str = "Consulta registrada correctamente";

/// Who is looking at the appointments page and what they may do there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScope {
    pub role: Role,
    pub clinic_id: i64,
    pub user_branch: Option<i64>,
}

impl PageScope {
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self {
            role: profile.role(),
            clinic_id: profile.id_clinica,
            user_branch: profile.id_sucursal.filter(|id| *id > 0),
        }
    }

    /// Non-admins with a branch only ever see that branch.
    pub fn pinned_branch(&self) -> Option<i64> {
        if self.role.is_admin() {
            None
        } else {
            self.user_branch
        }
    }

    pub fn can_create_internal(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Receptionist)
    }

    pub fn can_register_consultation(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Doctor)
    }

    pub fn can_filter_by_branch(&self) -> bool {
        self.role.is_admin()
    }

    /// The filter actually sent to the backend. Only admins choose the
    /// branch; everyone else gets their own, or none.
    pub fn scoped(&self, requested: &AppointmentFilter) -> AppointmentFilter {
        let id_sucursal = if self.can_filter_by_branch() {
            requested.id_sucursal.filter(|id| *id > 0)
        } else {
            self.pinned_branch()
        };

        AppointmentFilter {
            id_sucursal,
            ..requested.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub crear_cita_interna: bool,
    pub registrar_consulta: bool,
    pub filtrar_por_sucursal: bool,
}

impl From<&PageScope> for Permissions {
    fn from(scope: &PageScope) -> Self {
        Self {
            crear_cita_interna: scope.can_create_internal(),
            registrar_consulta: scope.can_register_consultation(),
            filtrar_por_sucursal: scope.can_filter_by_branch(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBoard {
    pub permisos: Permissions,
    pub sucursal_usuario: Option<i64>,
    pub filtro: AppointmentFilter,
    pub citas: Vec<Appointment>,
    pub sucursales: Vec<Branch>,
    pub pacientes: Vec<Patient>,
    pub servicios: Vec<ServiceOffering>,
    pub doctores: Vec<Worker>,
    /// Preselections of the create and consultation dialogs.
    pub sucursal_crear: Option<i64>,
    pub paciente_crear: Option<i64>,
    pub cita_consulta: Option<i64>,
    pub citas_sin_consulta: Vec<Appointment>,
    pub estado: PageStatus,
}

/// Result of a page action plus the reloaded list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    pub cita: Option<Appointment>,
    pub consulta: Option<Consultation>,
    /// `None` when the reload after the action failed.
    pub citas: Option<Vec<Appointment>>,
    pub citas_sin_consulta: Vec<Appointment>,
    pub estado: PageStatus,
}

pub fn pending_consultations(appointments: &[Appointment]) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.awaits_consultation())
        .cloned()
        .collect()
}

pub fn active_doctors(workers: Vec<Worker>) -> Vec<Worker> {
    workers.into_iter().filter(Worker::is_active_doctor).collect()
}

pub struct AppointmentPage {
    appointments: AppointmentService,
    branches: BranchService,
    catalog: CatalogService,
    patients: PatientService,
    workers: WorkerService,
    scope: PageScope,
}

impl AppointmentPage {
    pub fn new(backend: BackendClient, scope: PageScope) -> Self {
        Self {
            appointments: AppointmentService::new(backend.clone()),
            branches: BranchService::new(backend.clone()),
            catalog: CatalogService::new(backend.clone()),
            patients: PatientService::new(backend.clone()),
            workers: WorkerService::new(backend),
            scope,
        }
    }

    pub fn scope(&self) -> &PageScope {
        &self.scope
    }

    async fn staff(&self) -> Result<Vec<Worker>> {
        match self.scope.pinned_branch() {
            Some(branch_id) => {
                self.workers
                    .list_by_branch(self.scope.clinic_id, branch_id, None)
                    .await
            }
            None => self.workers.list_by_clinic(self.scope.clinic_id, None).await,
        }
    }

    /// Loads everything the page shows in one batch. A failure leaves the
    /// board empty with the error in its banner.
    pub async fn load(&self, requested: &AppointmentFilter) -> AppointmentBoard {
        let clinic_id = self.scope.clinic_id;
        let filter = self.scope.scoped(requested);

        let mut board = AppointmentBoard {
            permisos: Permissions::from(&self.scope),
            sucursal_usuario: self.scope.user_branch,
            filtro: filter.clone(),
            citas: Vec::new(),
            sucursales: Vec::new(),
            pacientes: Vec::new(),
            servicios: Vec::new(),
            doctores: Vec::new(),
            sucursal_crear: None,
            paciente_crear: None,
            cita_consulta: None,
            citas_sin_consulta: Vec::new(),
            estado: PageStatus::default(),
        };

        let loaded = tokio::try_join!(
            self.branches.list_by_clinic(clinic_id),
            self.catalog.list_active(clinic_id),
            self.patients.list_by_clinic(clinic_id, None),
            self.appointments.list_by_clinic(clinic_id, &filter),
            self.staff()
        );

        match loaded {
            Ok((sucursales, servicios, pacientes, citas, workers)) => {
                board.sucursal_crear = self
                    .scope
                    .pinned_branch()
                    .or_else(|| sucursales.first().map(|b| b.id));
                board.paciente_crear = pacientes.first().map(|p| p.id);
                board.citas_sin_consulta = pending_consultations(&citas);
                board.cita_consulta = board.citas_sin_consulta.first().map(|a| a.id);

                board.sucursales = sucursales;
                board.servicios = servicios;
                board.pacientes = pacientes;
                board.citas = citas;
                board.doctores = active_doctors(workers);
            }
            Err(err) => {
                warn!("Appointment page failed to load for clinic {}: {}", clinic_id, err);
                board.estado.set_error(err.to_string());
            }
        }

        board
    }

    /// Reloads the list with the scoped filter.
    pub async fn list(&self, requested: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let filter = self.scope.scoped(requested);
        self.appointments
            .list_by_clinic(self.scope.clinic_id, &filter)
            .await
    }

    async fn refreshed(
        &self,
        requested: &AppointmentFilter,
        cita: Option<Appointment>,
        consulta: Option<Consultation>,
        message: &str,
    ) -> AppointmentUpdate {
        let mut estado = PageStatus::default();
        estado.succeed(message);

        let citas = match self.list(requested).await {
            Ok(citas) => Some(citas),
            Err(err) => {
                warn!("Appointment reload failed: {}", err);
                estado.set_error(err.to_string());
                None
            }
        };

        AppointmentUpdate {
            cita,
            consulta,
            citas_sin_consulta: citas.as_deref().map(pending_consultations).unwrap_or_default(),
            citas,
            estado,
        }
    }

    pub async fn create_internal(
        &self,
        form: &InternalAppointmentForm,
        requested: &AppointmentFilter,
    ) -> Result<AppointmentUpdate, AppointmentError> {
        if !self.scope.can_create_internal() {
            return Err(AppointmentError::CannotCreate);
        }

        let mut form = form.clone();
        if let Some(branch_id) = self.scope.pinned_branch() {
            form.id_sucursal = Some(branch_id);
        }
        let request = form.to_request(self.scope.clinic_id)?;

        let cita = self.appointments.create_internal(&request).await?;
        info!("Internal appointment {} created", cita.id);
        Ok(self
            .refreshed(requested, Some(cita), None, APPOINTMENT_CREATED)
            .await)
    }

    pub async fn assign_doctor(
        &self,
        appointment_id: i64,
        request: &AssignDoctorRequest,
        requested: &AppointmentFilter,
    ) -> Result<AppointmentUpdate, AppointmentError> {
        let cita = self
            .appointments
            .assign_doctor(appointment_id, request)
            .await?;
        Ok(self
            .refreshed(requested, Some(cita), None, DOCTOR_ASSIGNED)
            .await)
    }

    pub async fn register_consultation(
        &self,
        form: &ConsultationForm,
        requested: &AppointmentFilter,
    ) -> Result<AppointmentUpdate, AppointmentError> {
        if !self.scope.can_register_consultation() {
            return Err(AppointmentError::CannotRegister);
        }

        let (appointment_id, request) = form.to_request()?;
        let consulta = self
            .appointments
            .register_consultation(appointment_id, &request)
            .await?;
        info!("Consultation registered for appointment {}", appointment_id);
        Ok(self
            .refreshed(requested, None, Some(consulta), CONSULTATION_REGISTERED)
            .await)
    }
}
