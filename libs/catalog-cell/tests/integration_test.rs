use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::models::CreateClinicRequest;
use catalog_cell::router::{clinic_routes, service_routes};
use catalog_cell::services::ClinicService;
use shared_backend::BackendClient;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestProfile, TEST_COOKIE};

fn services_app(server: &MockServer, profile: TestProfile) -> Router {
    service_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(profile.to_session()))
}

async fn body_json_of(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_inactive_view_requests_inactive_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/Servicios/clinica/1"))
        .and(query_param("incluirInactivos", "true"))
        .and(query_param("nombre", "lim"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::service(1, 1, "Limpieza", true),
            MockBackendResponses::service(2, 1, "Limpieza profunda", false)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = services_app(&server, TestProfile::admin())
        .oneshot(request("GET", "/?nombre=lim&inactivos=true", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    let services = body["servicios"].as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["id"], 2);
    assert_eq!(body["inactivos"], true);
}

#[tokio::test]
async fn test_services_are_admin_only() {
    let server = MockServer::start().await;

    let response = services_app(&server, TestProfile::receptionist())
        .oneshot(request("GET", "/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_reactivate_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Servicios"))
        .and(body_json(json!({
            "idClinica": 1,
            "nombreServicio": "Ortodoncia",
            "duracionMin": 60,
            "precioBase": 300.0
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::service(9, 1, "Ortodoncia", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/Servicios/4"))
        .and(body_json(json!({"activo": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::service(4, 1, "Rayos X", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let invalid = services_app(&server, TestProfile::admin())
        .oneshot(request("POST", "/", Some(json!({"nombreServicio": "Ortodoncia", "duracionMin": 0}))))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let created = services_app(&server, TestProfile::admin())
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"nombreServicio": " Ortodoncia ", "duracionMin": 60, "precioBase": 300.0})),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body_json_of(created).await["mensaje"], "Servicio creado correctamente.");

    let reactivated = services_app(&server, TestProfile::admin())
        .oneshot(request("POST", "/4/reactivate", None))
        .await
        .unwrap();
    assert_eq!(reactivated.status(), StatusCode::OK);
    assert_eq!(body_json_of(reactivated).await["mensaje"], "Servicio reactivado.");
}

#[tokio::test]
async fn test_deactivate_surfaces_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Servicios/4"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "Servicio en uso", "errors": ["Tiene citas pendientes"]})),
        )
        .mount(&server)
        .await;

    let response = services_app(&server, TestProfile::admin())
        .oneshot(request("DELETE", "/4", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json_of(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Servicio en uso"));
    assert!(error.contains("Tiene citas pendientes"));
}

#[tokio::test]
async fn test_clinic_page_loads_clinic_and_branches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Clinicas/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::clinic(1, "Clínica Central")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Sucursales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::branch(10, 1, "Centro"),
            MockBackendResponses::branch(20, 2, "Otra")
        ])))
        .mount(&server)
        .await;

    let app = clinic_routes(TestConfig::with_backend(server.uri()).to_arc())
        .layer(Extension(TestProfile::doctor().to_session()));
    let response = app.oneshot(request("GET", "/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["clinica"]["nombre"], "Clínica Central");
    assert_eq!(body["clinica"]["activa"], true);
    assert_eq!(body["sucursales"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clinic_service_list_and_create() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Clinicas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::clinic(1, "Clínica Central"),
            MockBackendResponses::clinic(2, "Clínica Norte")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Clinicas"))
        .and(body_json(json!({"nombre": "Clínica Sur", "telefono": "2222-1111", "direccion": "Zona 1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::clinic(3, "Clínica Sur")))
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::with_backend(server.uri()).to_app_config();
    let clinics = ClinicService::new(BackendClient::new(&config).with_session(TEST_COOKIE));

    let all = clinics.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].nombre, "Clínica Norte");

    let created = clinics
        .create(&CreateClinicRequest {
            nombre: "Clínica Sur".to_string(),
            telefono: "2222-1111".to_string(),
            direccion: "Zona 1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
}
