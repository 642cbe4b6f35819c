use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::Role;

pub const DEFAULT_PAGE_SIZE: usize = 8;

fn default_worker_role() -> Role {
    Role::Doctor
}

/// Clinic staff member (backend "usuario").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "NombreCompleto")]
    pub nombre_completo: String,
    #[serde(default, alias = "Correo")]
    pub correo: String,
    #[serde(default = "default_worker_role", alias = "Rol")]
    pub rol: Role,
    #[serde(default, alias = "Activo")]
    pub activo: bool,
    #[serde(default, alias = "DebeCambiarClave")]
    pub debe_cambiar_clave: bool,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "NombreClinica")]
    pub nombre_clinica: Option<String>,
    #[serde(default, alias = "IdSucursal")]
    pub id_sucursal: Option<i64>,
    #[serde(default, alias = "NombreSucursal")]
    pub nombre_sucursal: Option<String>,
    #[serde(default, alias = "FechaCreacion")]
    pub fecha_creacion: String,
}

impl Worker {
    pub fn is_active_doctor(&self) -> bool {
        self.rol == Role::Doctor && self.activo
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerRequest {
    pub nombre_completo: String,
    pub correo: String,
    pub id_clinica: i64,
    pub id_sucursal: i64,
    pub rol: Role,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_completo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_sucursal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl UpdateWorkerRequest {
    pub fn reactivate() -> Self {
        Self {
            activo: Some(true),
            ..Self::default()
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StaffError {
    #[error("Debes seleccionar una sucursal")]
    MissingBranch,

    #[error("Debes seleccionar una sucursal válida")]
    InvalidBranch,

    #[error("{0} es obligatorio")]
    MissingField(&'static str),

    #[error("Rol no permitido para un trabajador")]
    InvalidRole,
}

/// Create and edit dialogs share one payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerForm {
    #[serde(default)]
    pub nombre_completo: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default = "default_worker_role")]
    pub rol: Role,
    #[serde(default)]
    pub id_sucursal: Option<i64>,
}

impl WorkerForm {
    /// Prefills the edit dialog. Admins cannot be edited as admins; the
    /// form offers Doctor instead.
    pub fn from_worker(worker: &Worker) -> Self {
        Self {
            nombre_completo: worker.nombre_completo.clone(),
            correo: worker.correo.clone(),
            rol: match worker.rol {
                Role::Admin => Role::Doctor,
                other => other,
            },
            id_sucursal: worker.id_sucursal,
        }
    }

    fn checked(&self, branch_error: StaffError) -> Result<(String, String, i64), StaffError> {
        let id_sucursal = self
            .id_sucursal
            .filter(|id| *id > 0)
            .ok_or(branch_error)?;

        if !matches!(self.rol, Role::Doctor | Role::Receptionist) {
            return Err(StaffError::InvalidRole);
        }

        let nombre = self.nombre_completo.trim();
        if nombre.is_empty() {
            return Err(StaffError::MissingField("El nombre"));
        }
        let correo = self.correo.trim().to_lowercase();
        if correo.is_empty() {
            return Err(StaffError::MissingField("El correo"));
        }

        Ok((nombre.to_string(), correo, id_sucursal))
    }

    pub fn to_create(&self, clinic_id: i64) -> Result<CreateWorkerRequest, StaffError> {
        let (nombre_completo, correo, id_sucursal) = self.checked(StaffError::MissingBranch)?;
        Ok(CreateWorkerRequest {
            nombre_completo,
            correo,
            id_clinica: clinic_id,
            id_sucursal,
            rol: self.rol,
        })
    }

    pub fn to_update(&self) -> Result<UpdateWorkerRequest, StaffError> {
        let (nombre_completo, correo, id_sucursal) = self.checked(StaffError::InvalidBranch)?;
        Ok(UpdateWorkerRequest {
            nombre_completo: Some(nombre_completo),
            correo: Some(correo),
            id_sucursal: Some(id_sucursal),
            rol: Some(self.rol),
            activo: None,
        })
    }
}

/// List filters of the workers table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFilter {
    #[serde(default)]
    pub id_sucursal: Option<i64>,
    /// Role code or name; anything unrecognised shows every role.
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub inactivos: bool,
    #[serde(default)]
    pub pagina: Option<usize>,
    #[serde(default)]
    pub tamano: Option<usize>,
}

impl WorkerFilter {
    pub fn role(&self) -> Option<Role> {
        self.rol
            .as_deref()
            .map(Role::parse)
            .filter(|role| *role != Role::Unknown)
    }

    pub fn name(&self) -> Option<&str> {
        self.nombre.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn branch(&self) -> Option<i64> {
        self.id_sucursal.filter(|id| *id > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub elementos: Vec<T>,
    pub pagina: usize,
    pub tamano_pagina: usize,
    pub total: usize,
    pub total_paginas: usize,
}

impl<T: Clone> Page<T> {
    /// One page of `items`. The page number is clamped into range and there
    /// is always at least one page.
    pub fn of(items: &[T], page: Option<usize>, size: Option<usize>) -> Self {
        let size = size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        let total = items.len();
        let total_pages = total.div_ceil(size).max(1);
        let page = page.unwrap_or(1).clamp(1, total_pages);

        let start = (page - 1) * size;
        let elementos = items.iter().skip(start).take(size).cloned().collect();

        Self {
            elementos,
            pagina: page,
            tamano_pagina: size,
            total,
            total_paginas: total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerMutation {
    pub trabajador: Option<Worker>,
    pub mensaje: String,
}
