use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_models::auth::Role;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestProfile};
use staff_cell::router::worker_routes;

fn app(server: &MockServer, profile: TestProfile) -> Router {
    worker_routes(TestConfig::with_backend(server.uri()).to_arc())
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

async fn mount_branches(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Sucursales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::branch(10, 1, "Centro"),
            MockBackendResponses::branch(30, 3, "Ajena")
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_hides_admins_and_paginates() {
    let server = MockServer::start().await;
    mount_branches(&server).await;

    let mut workers = vec![MockBackendResponses::worker(1, Role::Admin, None, true)];
    workers.extend((2..=11).map(|id| MockBackendResponses::worker(id, Role::Doctor, Some(10), true)));

    Mock::given(method("GET"))
        .and(path("/api/Usuarios/clinica/1/sucursal/10"))
        .and(query_param("nombre", "tra"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(workers)))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, TestProfile::admin())
        .oneshot(request("GET", "/?idSucursal=10&nombre=%20tra&pagina=2", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    assert_eq!(body["sucursales"].as_array().unwrap().len(), 1);
    assert_eq!(body["sucursalPorDefecto"], 10);
    assert_eq!(body["trabajadores"]["total"], 10);
    assert_eq!(body["trabajadores"]["totalPaginas"], 2);
    assert_eq!(body["trabajadores"]["pagina"], 2);
    assert_eq!(body["trabajadores"]["elementos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_inactive_listing_uses_its_endpoint() {
    let server = MockServer::start().await;
    mount_branches(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/Usuarios/clinica/1/inactivos"))
        .and(query_param("idSucursal", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::worker(4, Role::Receptionist, Some(10), false),
            MockBackendResponses::worker(5, Role::Doctor, Some(10), false)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, TestProfile::admin())
        .oneshot(request("GET", "/?inactivos=true&idSucursal=10&rol=Recepcionista", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json_of(response).await;
    let items = body["trabajadores"]["elementos"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 4);
}

#[tokio::test]
async fn test_non_admin_is_refused() {
    let server = MockServer::start().await;

    let response = app(&server, TestProfile::doctor())
        .oneshot(request("GET", "/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_requires_branch_then_posts_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Usuarios"))
        .and(body_json(json!({
            "nombreCompleto": "Luis Pérez",
            "correo": "luis@clinica.com",
            "idClinica": 1,
            "idSucursal": 10,
            "rol": 3
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::worker(12, Role::Receptionist, Some(10), true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let missing = app(&server, TestProfile::admin())
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"nombreCompleto": "Luis", "correo": "luis@clinica.com"})),
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json_of(missing).await["error"], "Debes seleccionar una sucursal");

    let created = app(&server, TestProfile::admin())
        .oneshot(request(
            "POST",
            "/",
            Some(json!({
                "nombreCompleto": " Luis Pérez ",
                "correo": "LUIS@clinica.com",
                "rol": 3,
                "idSucursal": 10
            })),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(
        body_json_of(created).await["mensaje"],
        "Trabajador creado. Se envió contraseña temporal al correo."
    );
}

#[tokio::test]
async fn test_deactivate_and_reactivate() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Usuarios/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/Usuarios/7"))
        .and(body_json(json!({"activo": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::worker(7, Role::Doctor, Some(10), true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let deactivated = app(&server, TestProfile::admin())
        .oneshot(request("DELETE", "/7", None))
        .await
        .unwrap();
    assert_eq!(deactivated.status(), StatusCode::OK);
    assert_eq!(
        body_json_of(deactivated).await["mensaje"],
        "Trabajador desactivado correctamente."
    );

    let reactivated = app(&server, TestProfile::admin())
        .oneshot(request("POST", "/7/reactivate", None))
        .await
        .unwrap();
    assert_eq!(reactivated.status(), StatusCode::OK);
    let body = body_json_of(reactivated).await;
    assert_eq!(body["trabajador"]["activo"], true);
    assert_eq!(body["mensaje"], "Trabajador reactivado correctamente.");
}
