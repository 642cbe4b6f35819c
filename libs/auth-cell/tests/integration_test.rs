use axum::{
    body::Body,
    http::{header::SET_COOKIE, Request, StatusCode},
    Extension, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::router::{auth_routes, profile_routes, session_routes};
use shared_utils::test_utils::{TestConfig, TestProfile, TEST_COOKIE};

async fn body_json_of(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_relays_cookie_and_profile() {
    let server = MockServer::start().await;
    let profile = TestProfile::admin();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"correo": "admin@clinica.com", "clave": "secreta"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "clynic_access_token=tok123; Path=/; HttpOnly")
                .set_body_json(json!({"exito": true, "mensaje": "Bienvenido"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("cookie", "clynic_access_token=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.to_json()))
        .expect(1)
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_backend(server.uri()).to_arc());
    let request = json_request(
        "POST",
        "/login",
        json!({"correo": " Admin@Clinica.com ", "clave": "secreta", "next": "/branches"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(SET_COOKIE).unwrap(),
        "clynic_access_token=tok123; Path=/; HttpOnly"
    );

    let body = body_json_of(response).await;
    assert_eq!(body["exito"], true);
    assert_eq!(body["redirect"], "/branches");
    assert_eq!(body["usuario"]["id"], profile.id);
}

#[tokio::test]
async fn test_login_rejected_surfaces_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"exito": false, "mensaje": "Credenciales inválidas"})),
        )
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_backend(server.uri()).to_arc());
    let request = json_request("POST", "/login", json!({"correo": "a@b.com", "clave": "x"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json_of(response).await;
    assert_eq!(body["error"], "Credenciales inválidas");
}

#[tokio::test]
async fn test_reset_password_mismatch_never_calls_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_backend(server.uri()).to_arc());
    let request = json_request(
        "POST",
        "/reset-password",
        json!({"correo": "a@b.com", "codigo": "123456", "nuevaClave": "uno", "confirmarClave": "dos"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json_of(response).await;
    assert_eq!(body["error"], "Las claves no coinciden");
}

#[tokio::test]
async fn test_forgot_password_default_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(body_json(json!({"correo": "ana@clinica.com"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let app = auth_routes(TestConfig::with_backend(server.uri()).to_arc());
    let request = json_request("POST", "/forgot-password", json!({"correo": " ANA@clinica.com"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(
        body["mensaje"],
        "Si el correo existe, recibirás un código de verificación"
    );
}

#[tokio::test]
async fn test_session_lists_visible_navigation() {
    let profile = TestProfile::receptionist();
    let app: Router = session_routes(TestConfig::default().to_arc())
        .layer(Extension(profile.to_session()));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["rol"], "Recepcionista");

    let urls: Vec<&str> = body["navegacion"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["url"].as_str())
        .collect();
    assert!(urls.contains(&"/patients"));
    assert!(!urls.contains(&"/branches"));
}

#[tokio::test]
async fn test_change_password_clears_temporary_flag() {
    let server = MockServer::start().await;
    let mut profile = TestProfile::doctor();
    profile.must_change_password = true;

    Mock::given(method("PUT"))
        .and(path(format!("/api/Usuarios/{}/cambiar-clave", profile.id)))
        .and(header("cookie", TEST_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mensaje": "Clave cambiada"})))
        .expect(1)
        .mount(&server)
        .await;

    let app = profile_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(profile.to_session()));
    let request = json_request(
        "PUT",
        "/password",
        json!({"claveActual": "temporal", "nuevaClave": "nueva123", "confirmarClave": "nueva123"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["mensaje"], "Clave cambiada");
    assert_eq!(body["usuario"]["usuario"]["debeCambiarClave"], false);
    assert!(body["usuario"]["aviso"].is_null());
}

#[tokio::test]
async fn test_logout_clears_cookie_even_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = session_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(TestProfile::admin().to_session()));
    let request = Request::builder()
        .method("DELETE")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("clynic_access_token=;"));
}
