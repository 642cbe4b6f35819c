use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::booking_routes;
use appointment_cell::BOOKED_TOAST;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestProfile};

fn app(server: &MockServer) -> Router {
    booking_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(TestProfile::receptionist().to_session()))
}

async fn body_json_of(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/Citas/publica/catalogo/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::public_catalog(5, &[20, 30], &[1, 2])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_form_without_clinic_starts_empty() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["idClinica"], 0);
    assert!(body["catalogo"].is_null());
    assert!(body["estado"]["error"].is_null());
    assert_eq!(body["puedeEnviar"], false);
}

#[tokio::test]
async fn test_invalid_clinic_id_is_rejected() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(Request::builder().uri("/?clinica=abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json_of(response).await["error"],
        "Debes indicar un ID de clínica válido."
    );
}

#[tokio::test]
async fn test_catalog_selects_first_branch() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let response = app(&server)
        .oneshot(Request::builder().uri("/?clinica=%205").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["idClinica"], 5);
    assert_eq!(body["formulario"]["idSucursal"], 20);
    assert_eq!(body["catalogo"]["servicios"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_submit_normalizes_and_clears_form() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/Citas/publica"))
        .and(body_json(json!({
            "idClinica": 5,
            "idSucursal": 30,
            "nombres": "Ana",
            "apellidos": "Gómez",
            "telefono": "5555-1234",
            "correo": "ana@correo.com",
            "fechaHoraInicioPlan": "2025-03-10T09:00:00",
            "notas": "",
            "idsServicios": [1]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointment(42, 30, 1, false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(post_json(json!({
            "idClinica": "5",
            "idSucursal": 30,
            "idsServicios": [1, 9],
            "nombres": " Ana ",
            "apellidos": "Gómez ",
            "correo": " ANA@correo.com",
            "telefono": " 5555-1234 ",
            "fechaHoraInicioPlan": "2025-03-10T09:00",
            "notas": "  "
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json_of(response).await;
    assert_eq!(body["mensajeExito"], "Tu cita #42 fue agendada exitosamente.");
    assert_eq!(body["cita"]["id"], 42);
    assert_eq!(body["estado"]["toasts"][0]["message"], BOOKED_TOAST);
    assert_eq!(body["formulario"]["fechaHoraInicioPlan"], "");
    assert!(body["formulario"]["idsServicios"].as_array().unwrap().is_empty());
    assert_eq!(body["formulario"]["nombres"], " Ana ");
    assert_eq!(body["formulario"]["idSucursal"], 30);
}

#[tokio::test]
async fn test_incomplete_submission_never_posts() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/Citas/publica"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(post_json(json!({
            "idClinica": 5,
            "idsServicios": [1],
            "nombres": "A",
            "apellidos": "Gómez",
            "correo": "ana@correo.com",
            "fechaHoraInicioPlan": "2025-03-10T09:00"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json_of(response).await["error"],
        "Completa los campos requeridos para agendar la cita."
    );
}

#[tokio::test]
async fn test_catalog_failure_uses_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/Citas/publica/catalogo/8"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Clínica no encontrada"})))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(Request::builder().uri("/?clinica=8").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json_of(response).await["error"], "Clínica no encontrada");
}
