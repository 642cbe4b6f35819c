use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};

use shared_backend::{cookie_pairs, BackendClient};
use shared_models::auth::UserProfile;

use crate::models::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ResetPasswordRequest,
};
use crate::services::session::ProfileSource;

pub struct AuthService {
    backend: BackendClient,
}

/// Outcome of a successful backend login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub response: AuthResponse,
    /// `Set-Cookie` values to relay to the browser.
    pub cookies: Vec<String>,
    /// Profile fetched with the fresh session, when the login succeeded.
    pub profile: Option<UserProfile>,
}

impl AuthService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        debug!("Logging in {}", request.correo);

        let (response, cookies): (AuthResponse, Vec<String>) = self
            .backend
            .request_with_cookies(
                Method::POST,
                "/auth/login",
                Some(json!(request)),
                "Error en el login",
            )
            .await?;

        if !response.exito {
            return Ok(LoginOutcome {
                response,
                cookies,
                profile: None,
            });
        }

        // Confirm the new session the same way the edge gate will.
        let session = self.backend.with_session(cookie_pairs(&cookies));
        let profile = AuthService::new(session).profile().await?;

        Ok(LoginOutcome {
            response,
            cookies,
            profile: Some(profile),
        })
    }

    /// Best effort: a failed backend logout still clears the browser side.
    pub async fn logout(&self) -> Vec<String> {
        debug!("Logging out");

        match self
            .backend
            .request_cookies(Method::POST, "/auth/logout", None, "Error al cerrar sesión")
            .await
        {
            Ok(cookies) => cookies,
            Err(e) => {
                warn!("Backend logout failed: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        debug!("Fetching profile");
        let profile = self
            .backend
            .get("/auth/me", "Error al obtener el perfil")
            .await?;
        Ok(profile)
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<String> {
        debug!("Requesting password recovery code");

        let body: MessageResponse = self
            .backend
            .request_lenient(
                Method::POST,
                "/auth/forgot-password",
                Some(json!({ "correo": request.correo.trim().to_lowercase() })),
                "No se pudo enviar el código de recuperación",
            )
            .await?;

        Ok(body.text_or("Si el correo existe, recibirás un código de verificación"))
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String> {
        debug!("Resetting password");

        let body: MessageResponse = self
            .backend
            .request_lenient(
                Method::POST,
                "/auth/reset-password",
                Some(json!(request)),
                "No se pudo restablecer la contraseña",
            )
            .await?;

        Ok(body.text_or("Contraseña actualizada exitosamente"))
    }

    pub async fn change_password(&self, user_id: i64, request: &ChangePasswordRequest) -> Result<String> {
        debug!("Changing password for user {}", user_id);

        let body: MessageResponse = self
            .backend
            .request_lenient(
                Method::PUT,
                &format!("/api/Usuarios/{}/cambiar-clave", user_id),
                Some(json!(request)),
                "No se pudo cambiar la contraseña",
            )
            .await?;

        Ok(body.text_or("Clave actualizada exitosamente"))
    }
}

#[async_trait]
impl ProfileSource for AuthService {
    async fn fetch_profile(&self) -> Result<UserProfile> {
        self.profile().await
    }
}
