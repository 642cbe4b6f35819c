use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_backend::{to_app_error, BackendClient};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::SessionContext;

use crate::models::{
    safe_next_path, AuthError, ChangePasswordRequest, ForgotPasswordRequest, LoginForm,
    LoginResult, ResetPasswordRequest, SessionView,
};
use crate::services::{AuthService, SessionStore};

/// Cookie the dashboard front end keeps alongside the backend session.
pub const ACCESS_TOKEN_COOKIE: &str = "clynic_access_token";

fn validation(err: AuthError) -> AppError {
    AppError::ValidationError(err.to_string())
}

fn with_cookies(cookies: Vec<String>, body: Value) -> Response {
    let headers = cookies.into_iter().map(|cookie| (SET_COOKIE, cookie));
    (AppendHeaders(headers), Json(body)).into_response()
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(form): Json<LoginForm>,
) -> Result<Response, AppError> {
    let request = form.to_request().map_err(validation)?;
    let auth_service = AuthService::new(BackendClient::new(&config));

    let outcome = auth_service.login(&request).await.map_err(to_app_error)?;

    if !outcome.response.exito {
        debug!("Login rejected for {}", request.correo);
        return Err(AppError::Auth(outcome.response.mensaje));
    }

    info!("User {} signed in", request.correo);
    let result = LoginResult {
        exito: true,
        mensaje: outcome.response.mensaje,
        usuario: outcome.profile,
        redirect: safe_next_path(form.next.as_deref()),
    };

    Ok(with_cookies(outcome.cookies, json!(result)))
}

#[axum::debug_handler]
pub async fn forgot_password(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if request.correo.trim().is_empty() {
        return Err(validation(AuthError::MissingField("El correo")));
    }

    let auth_service = AuthService::new(BackendClient::new(&config));
    let mensaje = auth_service
        .forgot_password(&request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "mensaje": mensaje })))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let request = request.normalized().map_err(validation)?;

    let auth_service = AuthService::new(BackendClient::new(&config));
    let mensaje = auth_service
        .reset_password(&request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "mensaje": mensaje })))
}

#[axum::debug_handler]
pub async fn get_session(Extension(session): Extension<SessionContext>) -> Json<SessionView> {
    Json(SessionView::from_profile(session.profile))
}

#[axum::debug_handler]
pub async fn logout(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let auth_service = AuthService::new(session.backend(&config));
    let mut cookies = auth_service.logout().await;
    cookies.push(format!(
        "{}=; Path=/; Max-Age=0; SameSite=Lax",
        ACCESS_TOKEN_COOKIE
    ));

    info!("User {} signed out", session.profile.id);
    with_cookies(cookies, json!({ "mensaje": "Sesión cerrada", "redirect": "/auth/login" }))
}

/// Fresh profile from the backend, bypassing the edge gate's copy.
#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SessionView>, AppError> {
    let auth_service = AuthService::new(session.backend(&config));
    let store = SessionStore::with_profile(auth_service, session.profile);
    let profile = store.refresh().await.map_err(to_app_error)?;

    Ok(Json(SessionView::from_profile(profile)))
}

#[axum::debug_handler]
pub async fn change_password(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate().map_err(validation)?;

    let auth_service = AuthService::new(session.backend(&config));
    let mensaje = auth_service
        .change_password(session.profile.id, &request)
        .await
        .map_err(to_app_error)?;

    let store = SessionStore::with_profile(auth_service, session.profile);
    let usuario = store.mark_password_updated();

    Ok(Json(json!({
        "mensaje": mensaje,
        "usuario": usuario.map(SessionView::from_profile),
    })))
}
