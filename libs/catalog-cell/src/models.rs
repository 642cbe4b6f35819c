use serde::{Deserialize, Serialize};
use thiserror::Error;

use branch_cell::Branch;

pub const DEFAULT_DURATION_MIN: i32 = 30;

fn default_duration() -> i32 {
    DEFAULT_DURATION_MIN
}

/// Billable service of a clinic (backend "servicio").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "NombreServicio")]
    pub nombre_servicio: String,
    #[serde(default, alias = "DuracionMin")]
    pub duracion_min: i32,
    #[serde(default, alias = "PrecioBase")]
    pub precio_base: f64,
    #[serde(default, alias = "Activo")]
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub id_clinica: i64,
    pub nombre_servicio: String,
    pub duracion_min: i32,
    pub precio_base: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_servicio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duracion_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn reactivate() -> Self {
        Self {
            activo: Some(true),
            ..Self::default()
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("El nombre del servicio es obligatorio")]
    MissingName,

    #[error("La duración debe ser mayor a cero")]
    InvalidDuration,

    #[error("El precio no puede ser negativo")]
    InvalidPrice,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    #[serde(default)]
    pub nombre_servicio: String,
    #[serde(default = "default_duration")]
    pub duracion_min: i32,
    #[serde(default)]
    pub precio_base: f64,
}

impl ServiceForm {
    fn checked(&self) -> Result<String, CatalogError> {
        let nombre = self.nombre_servicio.trim();
        if nombre.is_empty() {
            return Err(CatalogError::MissingName);
        }
        if self.duracion_min <= 0 {
            return Err(CatalogError::InvalidDuration);
        }
        if self.precio_base < 0.0 || !self.precio_base.is_finite() {
            return Err(CatalogError::InvalidPrice);
        }
        Ok(nombre.to_string())
    }

    pub fn to_create(&self, clinic_id: i64) -> Result<CreateServiceRequest, CatalogError> {
        Ok(CreateServiceRequest {
            id_clinica: clinic_id,
            nombre_servicio: self.checked()?,
            duracion_min: self.duracion_min,
            precio_base: self.precio_base,
        })
    }

    pub fn to_update(&self) -> Result<UpdateServiceRequest, CatalogError> {
        Ok(UpdateServiceRequest {
            nombre_servicio: Some(self.checked()?),
            duracion_min: Some(self.duracion_min),
            precio_base: Some(self.precio_base),
            activo: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilter {
    #[serde(default)]
    pub nombre: Option<String>,
    /// Shows the inactive services instead of the active ones.
    #[serde(default)]
    pub inactivos: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceList {
    pub servicios: Vec<ServiceOffering>,
    pub inactivos: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMutation {
    pub servicio: Option<ServiceOffering>,
    pub mensaje: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    #[serde(default, alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "Nombre")]
    pub nombre: String,
    #[serde(default, alias = "Telefono")]
    pub telefono: String,
    #[serde(default, alias = "Direccion")]
    pub direccion: String,
    #[serde(default, alias = "Activa")]
    pub activa: bool,
    #[serde(default, alias = "FechaCreacion")]
    pub fecha_creacion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicRequest {
    pub nombre: String,
    pub telefono: String,
    pub direccion: String,
}

/// The signed-in user's clinic and its branches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicView {
    pub clinica: Clinic,
    pub sucursales: Vec<Branch>,
}
