use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::UserProfile;
use shared_models::authorization::NavItem;

pub const TEMPORARY_PASSWORD_WARNING: &str =
    "Tu cuenta tiene contraseña temporal. Debes cambiarla para mantener la seguridad de tu sesión.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub correo: String,
    pub clave: String,
}

/// Login form as posted to the dashboard; `next` is the page to return to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub correo: String,
    pub clave: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default, alias = "Exito")]
    pub exito: bool,
    #[serde(default, alias = "Mensaje")]
    pub mensaje: String,
    #[serde(default, alias = "Usuario")]
    pub usuario: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub correo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub correo: String,
    pub codigo: String,
    pub nueva_clave: String,
    pub confirmar_clave: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub clave_actual: String,
    pub nueva_clave: String,
    pub confirmar_clave: String,
}

/// Body of the backend's message-only endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default, alias = "Mensaje")]
    pub mensaje: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn text_or(self, default: &str) -> String {
        self.mensaje
            .filter(|m| !m.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
            .unwrap_or_else(|| default.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub exito: bool,
    pub mensaje: String,
    pub usuario: Option<UserProfile>,
    pub redirect: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub usuario: UserProfile,
    pub rol: &'static str,
    pub navegacion: Vec<NavItem>,
    pub aviso: Option<&'static str>,
}

impl SessionView {
    pub fn from_profile(profile: UserProfile) -> Self {
        let role = profile.role();
        let aviso = profile
            .must_change_password()
            .then_some(TEMPORARY_PASSWORD_WARNING);

        Self {
            rol: role.as_str(),
            navegacion: shared_models::authorization::visible_nav(role),
            aviso,
            usuario: profile,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} es obligatorio")]
    MissingField(&'static str),

    #[error("Las claves no coinciden")]
    PasswordMismatch,
}

impl LoginForm {
    /// Normalized backend payload: trimmed, lower-cased email.
    pub fn to_request(&self) -> Result<LoginRequest, AuthError> {
        let correo = self.correo.trim().to_lowercase();
        if correo.is_empty() {
            return Err(AuthError::MissingField("El correo"));
        }
        if self.clave.is_empty() {
            return Err(AuthError::MissingField("La clave"));
        }

        Ok(LoginRequest {
            correo,
            clave: self.clave.clone(),
        })
    }
}

impl ResetPasswordRequest {
    pub fn normalized(&self) -> Result<Self, AuthError> {
        if self.nueva_clave != self.confirmar_clave {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(Self {
            correo: self.correo.trim().to_lowercase(),
            codigo: self.codigo.trim().to_string(),
            nueva_clave: self.nueva_clave.clone(),
            confirmar_clave: self.confirmar_clave.clone(),
        })
    }
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.clave_actual.is_empty() {
            return Err(AuthError::MissingField("La clave actual"));
        }
        if self.nueva_clave.is_empty() {
            return Err(AuthError::MissingField("La nueva clave"));
        }
        if self.nueva_clave != self.confirmar_clave {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next_path(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}
