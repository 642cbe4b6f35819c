use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, UserProfile};

use crate::extractor::SessionContext;

pub const TEST_COOKIE: &str = "session=test-session";

pub struct TestConfig {
    pub api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
        }
    }
}

impl TestConfig {
    /// Points the config at a mock backend, usually `MockServer::uri()`.
    pub fn with_backend(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::with_api_url(self.api_url.clone())
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub clinic_id: i64,
    pub branch_id: Option<i64>,
    pub must_change_password: bool,
}

impl Default for TestProfile {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Usuario Prueba".to_string(),
            email: "test@clinica.com".to_string(),
            role: Role::Receptionist,
            clinic_id: 1,
            branch_id: Some(10),
            must_change_password: false,
        }
    }
}

impl TestProfile {
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            role,
            ..Self::default()
        }
    }

    pub fn admin() -> Self {
        Self {
            id: 1,
            name: "Admin Prueba".to_string(),
            email: "admin@clinica.com".to_string(),
            role: Role::Admin,
            branch_id: None,
            ..Self::default()
        }
    }

    pub fn doctor() -> Self {
        Self {
            id: 2,
            name: "Doctora Prueba".to_string(),
            email: "doctor@clinica.com".to_string(),
            role: Role::Doctor,
            ..Self::default()
        }
    }

    pub fn receptionist() -> Self {
        Self {
            id: 3,
            ..Self::default()
        }
    }

    pub fn in_branch(mut self, branch_id: i64) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    /// Backend `/auth/me` body, PascalCase like the real API.
    pub fn to_json(&self) -> Value {
        json!({
            "Id": self.id,
            "NombreCompleto": self.name,
            "Correo": self.email,
            "Rol": self.role.code(),
            "Activo": true,
            "DebeCambiarClave": self.must_change_password,
            "IdClinica": self.clinic_id,
            "NombreClinica": "Clínica Central",
            "IdSucursal": self.branch_id,
            "NombreSucursal": self.branch_id.map(|_| "Sucursal Centro"),
            "FechaCreacion": "2025-01-01T00:00:00"
        })
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            nombre_completo: self.name.clone(),
            correo: self.email.clone(),
            rol: self.role,
            activo: true,
            debe_cambiar_clave: self.must_change_password,
            id_clinica: self.clinic_id,
            nombre_clinica: Some("Clínica Central".to_string()),
            id_sucursal: self.branch_id,
            nombre_sucursal: self.branch_id.map(|_| "Sucursal Centro".to_string()),
            fecha_creacion: "2025-01-01T00:00:00".to_string(),
        }
    }

    pub fn to_session(&self) -> SessionContext {
        SessionContext {
            profile: self.to_profile(),
            cookie: TEST_COOKIE.to_string(),
        }
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn schedule(id: i64, branch_id: i64, day: u8, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "idSucursal": branch_id,
            "diaSemana": day,
            "horaInicio": start,
            "horaFin": end
        })
    }

    pub fn holiday(id: i64, branch_id: i64, date: &str, reason: Option<&str>) -> Value {
        json!({
            "id": id,
            "idSucursal": branch_id,
            "fecha": date,
            "motivo": reason
        })
    }

    pub fn branch(id: i64, clinic_id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "idClinica": clinic_id,
            "nombre": name,
            "direccion": format!("Calle {}", id),
            "activa": true
        })
    }

    pub fn service(id: i64, clinic_id: i64, name: &str, active: bool) -> Value {
        json!({
            "id": id,
            "idClinica": clinic_id,
            "nombreServicio": name,
            "duracionMin": 30,
            "precioBase": 25.0,
            "activo": active
        })
    }

    pub fn worker(id: i64, role: Role, branch_id: Option<i64>, active: bool) -> Value {
        json!({
            "id": id,
            "nombreCompleto": format!("Trabajador {}", id),
            "correo": format!("trabajador{}@clinica.com", id),
            "rol": role.code(),
            "activo": active,
            "debeCambiarClave": false,
            "idClinica": 1,
            "idSucursal": branch_id,
            "fechaCreacion": "2025-01-01T00:00:00"
        })
    }

    pub fn patient(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "idClinica": 1,
            "nombres": name.split(' ').next().unwrap_or(name),
            "apellidos": name.split_once(' ').map(|(_, rest)| rest).unwrap_or(""),
            "nombreCompleto": name,
            "correo": format!("paciente{}@correo.com", id),
            "telefono": "5555-0000",
            "fechaNacimiento": null,
            "fechaRegistro": "2025-01-01T00:00:00",
            "historialClinico": null,
            "consultasRecientes": []
        })
    }

    pub fn appointment(id: i64, branch_id: i64, status: u8, with_consultation: bool) -> Value {
        json!({
            "id": id,
            "idClinica": 1,
            "idSucursal": branch_id,
            "idPaciente": 100 + id,
            "idDoctor": null,
            "nombrePaciente": format!("Paciente {}", id),
            "correoPaciente": format!("paciente{}@correo.com", id),
            "telefonoPaciente": "5555-0000",
            "fechaHoraInicioPlan": "2025-03-10T09:00:00",
            "fechaHoraFinPlan": "2025-03-10T09:30:00",
            "estado": status,
            "notas": "",
            "subTotal": 25.0,
            "totalFinal": 25.0,
            "fechaCreacion": "2025-03-01T00:00:00",
            "servicios": [{
                "idServicio": 1,
                "nombreServicio": "Consulta general",
                "duracionMin": 30,
                "precio": 25.0
            }],
            "consultaMedica": if with_consultation {
                json!({
                    "id": 900 + id,
                    "idCita": id,
                    "idPaciente": 100 + id,
                    "diagnostico": "Control general",
                    "tratamiento": "",
                    "receta": "",
                    "examenesSolicitados": "",
                    "notasMedicas": "",
                    "fechaConsulta": "2025-03-10T09:30:00"
                })
            } else {
                Value::Null
            }
        })
    }

    pub fn clinic(id: i64, name: &str) -> Value {
        json!({
            "Id": id,
            "Nombre": name,
            "Telefono": "2222-0000",
            "Direccion": "Avenida Central",
            "Activa": true,
            "FechaCreacion": "2024-06-01T00:00:00"
        })
    }

    /// Public booking catalog with the given branches and services.
    pub fn public_catalog(clinic_id: i64, branch_ids: &[i64], service_ids: &[i64]) -> Value {
        json!({
            "idClinica": clinic_id,
            "sucursales": branch_ids
                .iter()
                .map(|id| json!({"id": id, "nombre": format!("Sucursal {}", id), "direccion": "Centro"}))
                .collect::<Vec<_>>(),
            "servicios": service_ids
                .iter()
                .map(|id| json!({
                    "id": id,
                    "nombreServicio": format!("Servicio {}", id),
                    "duracionMin": 30,
                    "precioBase": 20.0
                }))
                .collect::<Vec<_>>()
        })
    }
}
