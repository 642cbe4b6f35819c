//! Anonymous booking: a visitor picks a clinic by id, loads its public
//! catalog, and submits an appointment request.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shared_models::status::{PageStatus, ToastKind};

use crate::models::{Appointment, BookingError, PublicBookingForm, PublicCatalog};
use crate::services::appointment::AppointmentService;

pub const BOOKED_TOAST: &str = "Cita agendada. Revisa tu correo de confirmación.";

const MIN_NAME_CHARS: usize = 2;
const MIN_EMAIL_CHARS: usize = 5;

pub fn booked_message(appointment_id: i64) -> String {
    format!("Tu cita #{} fue agendada exitosamente.", appointment_id)
}

/// Positive integer clinic id, or nothing.
pub fn parse_clinic_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Clinic id as typed by the visitor, either a number or text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClinicRef {
    Id(i64),
    Text(String),
}

impl ClinicRef {
    pub fn id(&self) -> Option<i64> {
        match self {
            ClinicRef::Id(id) => Some(*id).filter(|id| *id > 0),
            ClinicRef::Text(raw) => parse_clinic_id(raw),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id_clinica: i64,
    pub catalogo: Option<PublicCatalog>,
    pub formulario: PublicBookingForm,
    pub puede_enviar: bool,
    pub cita: Option<Appointment>,
    pub mensaje_exito: Option<String>,
    pub estado: PageStatus,
}

pub struct PublicBooking<'a> {
    service: &'a AppointmentService,
    clinic_id: i64,
    catalog: Option<PublicCatalog>,
    booked: Option<Appointment>,
    success: Option<String>,
    pub form: PublicBookingForm,
    pub status: PageStatus,
}

impl<'a> PublicBooking<'a> {
    pub fn new(service: &'a AppointmentService, form: PublicBookingForm) -> Self {
        Self {
            service,
            clinic_id: 0,
            catalog: None,
            booked: None,
            success: None,
            form,
            status: PageStatus::default(),
        }
    }

    pub fn clinic_id(&self) -> i64 {
        self.clinic_id
    }

    pub fn catalog(&self) -> Option<&PublicCatalog> {
        self.catalog.as_ref()
    }

    pub async fn load_catalog(&mut self, clinic: Option<i64>) -> Result<(), BookingError> {
        let Some(clinic_id) = clinic.filter(|id| *id > 0) else {
            self.catalog = None;
            self.clinic_id = 0;
            self.status.set_error(BookingError::InvalidClinic.to_string());
            return Err(BookingError::InvalidClinic);
        };

        self.status.begin();
        match self.service.public_catalog(clinic_id).await {
            Ok(catalog) => {
                self.apply_catalog(clinic_id, catalog);
                Ok(())
            }
            Err(err) => {
                warn!("Public catalog for clinic {} failed: {}", clinic_id, err);
                self.catalog = None;
                self.status.set_error(err.to_string());
                Err(BookingError::Backend(err))
            }
        }
    }

    /// Keeps the chosen branch when the catalog still lists it, else picks
    /// the first one. Services that disappeared are unselected.
    pub fn apply_catalog(&mut self, clinic_id: i64, catalog: PublicCatalog) {
        self.form.id_sucursal = match self.form.branch() {
            Some(branch_id) if catalog.has_branch(branch_id) => Some(branch_id),
            _ => catalog.sucursales.first().map(|b| b.id),
        };
        self.form.ids_servicios.retain(|id| catalog.has_service(*id));

        self.clinic_id = clinic_id;
        self.catalog = Some(catalog);
    }

    pub fn toggle_service(&mut self, service_id: i64) {
        if let Some(pos) = self.form.ids_servicios.iter().position(|id| *id == service_id) {
            self.form.ids_servicios.remove(pos);
        } else {
            self.form.ids_servicios.push(service_id);
        }
    }

    pub fn can_submit(&self) -> bool {
        let form = &self.form;
        self.clinic_id > 0
            && form.branch().is_some()
            && !form.ids_servicios.is_empty()
            && form.nombres.trim().chars().count() >= MIN_NAME_CHARS
            && form.apellidos.trim().chars().count() >= MIN_NAME_CHARS
            && form.correo.trim().chars().count() >= MIN_EMAIL_CHARS
            && !form.fecha_hora_inicio_plan.trim().is_empty()
    }

    pub async fn submit(&mut self) -> Result<Appointment, BookingError> {
        let branch_id = match self.form.branch() {
            Some(branch_id) if self.can_submit() => branch_id,
            _ => {
                let message = BookingError::Incomplete.to_string();
                self.status.set_error(message.clone());
                self.status.warn(message);
                return Err(BookingError::Incomplete);
            }
        };

        self.status.begin();
        self.success = None;

        let request = self.form.to_request(self.clinic_id, branch_id);
        match self.service.create_public(&request).await {
            Ok(appointment) => {
                info!("Public appointment {} booked at clinic {}", appointment.id, self.clinic_id);
                self.success = Some(booked_message(appointment.id));
                self.status.toast(ToastKind::Success, BOOKED_TOAST);

                self.form.fecha_hora_inicio_plan.clear();
                self.form.ids_servicios.clear();
                self.form.notas.clear();

                self.booked = Some(appointment.clone());
                Ok(appointment)
            }
            Err(err) => {
                self.status.fail(err.to_string());
                Err(BookingError::Backend(err))
            }
        }
    }

    pub fn view(&self) -> BookingView {
        BookingView {
            id_clinica: self.clinic_id,
            catalogo: self.catalog.clone(),
            formulario: self.form.clone(),
            puede_enviar: self.can_submit(),
            cita: self.booked.clone(),
            mensaje_exito: self.success.clone(),
            estado: self.status.clone(),
        }
    }
}
