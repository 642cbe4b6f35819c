use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

use shared_backend::BackendClient;
use shared_config::AppConfig;
use shared_models::auth::UserProfile;
use shared_models::authorization::{can_access, is_public_path};

pub const LOGIN_PATH: &str = "/auth/login";
pub const UNAUTHORIZED_PATH: &str = "/401";

/// Signed-in user plus the cookie header to forward to the backend.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub profile: UserProfile,
    pub cookie: String,
}

impl SessionContext {
    pub fn backend(&self, config: &AppConfig) -> BackendClient {
        BackendClient::new(config).with_session(self.cookie.clone())
    }
}

/// Rebuilds the `Cookie` header value from the parsed jar.
pub fn cookie_header(jar: &CookieJar) -> String {
    jar.iter()
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn login_redirect(path_and_query: &str) -> Response {
    let target = format!("{}?next={}", LOGIN_PATH, urlencoding::encode(path_and_query));
    Redirect::temporary(&target).into_response()
}

async fn fetch_profile(config: &AppConfig, cookie: &str) -> Option<UserProfile> {
    if !config.is_configured() {
        return None;
    }

    let client = BackendClient::new(config).with_session(cookie);
    match client
        .get::<UserProfile>("/auth/me", "Sesión no válida")
        .await
    {
        Ok(profile) => Some(profile),
        Err(e) => {
            debug!("Session check failed: {}", e);
            None
        }
    }
}

// Edge gate: session check against the backend, then the role table.
pub async fn edge_middleware(
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let cookie = cookie_header(&jar);
    let profile = fetch_profile(&config, &cookie).await;

    if is_public_path(&path) {
        return match profile {
            Some(_) => Redirect::temporary("/").into_response(),
            None => next.run(request).await,
        };
    }

    let Some(profile) = profile else {
        return login_redirect(&path_and_query);
    };

    // Any signed-in role may land on the denial page, Unknown included.
    if path != UNAUTHORIZED_PATH && !can_access(profile.role(), &path) {
        warn!(
            "User {} with role {} denied access to {}",
            profile.id,
            profile.role(),
            path
        );
        return Redirect::temporary(UNAUTHORIZED_PATH).into_response();
    }

    request
        .extensions_mut()
        .insert(SessionContext { profile, cookie });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[test]
    fn test_login_redirect_encodes_next() {
        let response = login_redirect("/branches?id=2");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/auth/login?next=%2Fbranches%3Fid%3D2"
        );
    }
}
