use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Dashboard role. The backend sends it either as a numeric code or as a
/// name; both forms normalize here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Doctor,
    Receptionist,
    #[default]
    Unknown,
}

impl Role {
    pub const STAFF: [Role; 3] = [Role::Admin, Role::Doctor, Role::Receptionist];

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Role::Admin,
            2 => Role::Doctor,
            3 => Role::Receptionist,
            _ => Role::Unknown,
        }
    }

    /// Normalizes a code ("1") or a name ("admin"), trimmed and case-insensitive.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "1" | "admin" => Role::Admin,
            "2" | "doctor" => Role::Doctor,
            "3" | "recepcionista" => Role::Receptionist,
            _ => Role::Unknown,
        }
    }

    pub fn code(&self) -> Option<u8> {
        match self {
            Role::Admin => Some(1),
            Role::Doctor => Some(2),
            Role::Receptionist => Some(3),
            Role::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Receptionist => "Recepcionista",
            Role::Unknown => "Unknown",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Unknown)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The backend expects the numeric code on writes.
impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.code() {
            Some(code) => serializer.serialize_u8(code),
            None => serializer.serialize_none(),
        }
    }
}

struct RoleVisitor;

impl<'de> Visitor<'de> for RoleVisitor {
    type Value = Role;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a role code or role name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Role, E> {
        Ok(Role::from_code(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Role, E> {
        Ok(i64::try_from(v).map(Role::from_code).unwrap_or(Role::Unknown))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Role, E> {
        Ok(Role::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Role, E> {
        Ok(Role::Unknown)
    }

    fn visit_none<E: de::Error>(self) -> Result<Role, E> {
        Ok(Role::Unknown)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Role, D::Error> {
        deserializer.deserialize_any(RoleVisitor)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
        deserializer.deserialize_any(RoleVisitor)
    }
}

/// Signed-in user as returned by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(default, alias = "NombreCompleto")]
    pub nombre_completo: String,
    #[serde(default, alias = "Correo")]
    pub correo: String,
    #[serde(default, alias = "Rol")]
    pub rol: Role,
    #[serde(default, alias = "Activo")]
    pub activo: bool,
    #[serde(default, alias = "DebeCambiarClave")]
    pub debe_cambiar_clave: bool,
    #[serde(default, alias = "IdClinica")]
    pub id_clinica: i64,
    #[serde(default, alias = "NombreClinica")]
    pub nombre_clinica: Option<String>,
    #[serde(default, alias = "IdSucursal")]
    pub id_sucursal: Option<i64>,
    #[serde(default, alias = "NombreSucursal")]
    pub nombre_sucursal: Option<String>,
    #[serde(default, alias = "FechaCreacion")]
    pub fecha_creacion: String,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        self.rol
    }

    /// Branch a non-admin user is pinned to, if any.
    pub fn pinned_branch(&self) -> Option<i64> {
        if self.rol.is_admin() {
            return None;
        }
        self.id_sucursal.filter(|id| *id > 0)
    }

    pub fn must_change_password(&self) -> bool {
        !self.rol.is_admin() && self.debe_cambiar_clave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse_accepts_codes_and_names() {
        assert_eq!(Role::parse("1"), Role::Admin);
        assert_eq!(Role::parse(" ADMIN "), Role::Admin);
        assert_eq!(Role::parse("doctor"), Role::Doctor);
        assert_eq!(Role::parse("3"), Role::Receptionist);
        assert_eq!(Role::parse("Recepcionista"), Role::Receptionist);
        assert_eq!(Role::parse("Unknown"), Role::Unknown);
        assert_eq!(Role::parse("superuser"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
    }

    #[test]
    fn test_role_code_roundtrip() {
        for role in Role::STAFF {
            let code = role.code().unwrap();
            assert_eq!(Role::from_code(code as i64), role);
        }
        assert_eq!(Role::Unknown.code(), None);
        assert_eq!(Role::from_code(9), Role::Unknown);
    }

    #[test]
    fn test_profile_accepts_string_or_numeric_role() {
        let numeric: UserProfile = serde_json::from_value(json!({
            "id": 7, "nombreCompleto": "Ana", "correo": "ana@clinic.test",
            "rol": 3, "activo": true, "idClinica": 1, "idSucursal": 4,
            "fechaCreacion": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(numeric.rol, Role::Receptionist);
        assert_eq!(numeric.pinned_branch(), Some(4));

        let named: UserProfile = serde_json::from_value(json!({
            "Id": 1, "NombreCompleto": "Root", "Rol": "Admin", "IdClinica": 1,
            "IdSucursal": 4, "DebeCambiarClave": true
        }))
        .unwrap();
        assert_eq!(named.rol, Role::Admin);
        assert_eq!(named.pinned_branch(), None);
        assert!(!named.must_change_password());
    }

    #[test]
    fn test_role_serializes_as_code() {
        assert_eq!(serde_json::to_value(Role::Doctor).unwrap(), json!(2));
    }
}
