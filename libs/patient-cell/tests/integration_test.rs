use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::router::patient_routes;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestProfile};

fn app(server: &MockServer, profile: TestProfile) -> Router {
    patient_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(profile.to_session()))
}

async fn body_json_of(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn update_form() -> Value {
    json!({
        "nombres": " Ana ",
        "apellidos": "Gómez",
        "correo": " ANA@Correo.com ",
        "telefono": "5555-1111",
        "historial": {"alergias": " Penicilina "}
    })
}

#[tokio::test]
async fn test_search_is_trimmed_and_results_sorted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/Pacientes/clinica/1"))
        .and(query_param("busqueda", "go"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::patient(2, "Zoe Gonzalez"),
            MockBackendResponses::patient(1, "Ana Gómez")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, TestProfile::receptionist())
        .oneshot(
            Request::builder()
                .uri("/?busqueda=%20go%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["pacientes"][0]["nombreCompleto"], "Ana Gómez");
    assert_eq!(body["pacientes"][1]["nombreCompleto"], "Zoe Gonzalez");
    assert_eq!(body["puedeEditarHistorial"], false);
}

#[tokio::test]
async fn test_doctor_saves_patient_and_history() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/Pacientes/1"))
        .and(body_json(json!({
            "nombres": "Ana",
            "apellidos": "Gómez",
            "telefono": "5555-1111",
            "correo": "ana@correo.com"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::patient(1, "Ana Gómez")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/Pacientes/1/historial"))
        .and(body_json(json!({
            "enfermedadesPrevias": null,
            "medicamentosActuales": null,
            "alergias": "Penicilina",
            "antecedentesFamiliares": null,
            "observaciones": null
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 8, "idPaciente": 1, "alergias": "Penicilina"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, TestProfile::doctor())
        .oneshot(put_json("/1", update_form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["mensaje"], "Paciente actualizado correctamente");
    assert_eq!(body["historial"]["alergias"], "Penicilina");
}

#[tokio::test]
async fn test_receptionist_history_is_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/Pacientes/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::patient(1, "Ana Gómez")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/Pacientes/1/historial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server, TestProfile::receptionist())
        .oneshot(put_json("/1", update_form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json_of(response).await["historial"], Value::Null);
}

#[tokio::test]
async fn test_blank_email_is_rejected_and_backend_message_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/Pacientes/1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"mensaje": "El correo ya está registrado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let invalid = app(&server, TestProfile::admin())
        .oneshot(put_json("/1", json!({"nombres": "Ana", "apellidos": "Gómez", "correo": " "})))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json_of(invalid).await["error"], "El correo es obligatorio");

    let conflict = app(&server, TestProfile::admin())
        .oneshot(put_json("/1", update_form()))
        .await
        .unwrap();
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    assert_eq!(body_json_of(conflict).await["error"], "El correo ya está registrado");
}
