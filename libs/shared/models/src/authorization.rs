//! Role/route authorization table.
//!
//! Rules are checked in declaration order and the first rule whose prefix
//! matches wins, so more specific prefixes are listed before `/`. A path that
//! matches no rule is denied. The edge middleware and the navigation builder
//! both read [`ROUTE_RULES`]; nothing else decides access.

use serde::Serialize;

use crate::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session, including by [`Role::Unknown`].
    Public,
    Roles(&'static [Role]),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub access: Access,
}

impl RouteRule {
    /// Exact match, or the prefix followed by a path separator.
    pub fn matches(&self, path: &str) -> bool {
        if path == self.prefix {
            return true;
        }
        path.strip_prefix(self.prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn allows(&self, role: Role) -> bool {
        match self.access {
            Access::Public => true,
            Access::Roles(roles) => role.is_staff() && roles.contains(&role),
        }
    }
}

const STAFF: &[Role] = &[Role::Admin, Role::Doctor, Role::Receptionist];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const CLINICAL: &[Role] = &[Role::Admin, Role::Doctor];

pub const ROUTE_RULES: &[RouteRule] = &[
    RouteRule { prefix: "/auth", access: Access::Public },
    RouteRule { prefix: "/agendar-cita", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/doctors", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/branches", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/services", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/billing", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/reports", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/settings", access: Access::Roles(ADMIN_ONLY) },
    RouteRule { prefix: "/records", access: Access::Roles(CLINICAL) },
    RouteRule { prefix: "/appointment", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/patients", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/clinic", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/profile", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/help", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/401", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/session", access: Access::Roles(STAFF) },
    RouteRule { prefix: "/", access: Access::Roles(STAFF) },
];

pub fn matching_rule(path: &str) -> Option<&'static RouteRule> {
    ROUTE_RULES.iter().find(|rule| rule.matches(path))
}

/// Deny-by-default access check.
pub fn can_access(role: Role, path: &str) -> bool {
    matching_rule(path).is_some_and(|rule| rule.allows(role))
}

pub fn is_public_path(path: &str) -> bool {
    matching_rule(path).is_some_and(|rule| rule.access == Access::Public)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
}

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { title: "Dashboard", url: "/appointment" },
    NavItem { title: "Pacientes", url: "/patients" },
    NavItem { title: "Doctores", url: "/doctors" },
    NavItem { title: "Sucursales", url: "/branches" },
    NavItem { title: "Servicios", url: "/services" },
    NavItem { title: "Clínica", url: "/clinic" },
    NavItem { title: "Historial Clínico", url: "/records" },
    NavItem { title: "Facturación", url: "/billing" },
    NavItem { title: "Reportes", url: "/reports" },
    NavItem { title: "Configuración", url: "/settings" },
    NavItem { title: "Ayuda", url: "/help" },
];

/// Navigation entries the role may open.
pub fn visible_nav(role: Role) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| can_access(role, item.url))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receptionist_cannot_open_branches() {
        assert!(!can_access(Role::parse("Recepcionista"), "/branches"));
        assert!(!can_access(Role::Receptionist, "/branches/4/schedule"));
    }

    #[test]
    fn test_admin_can_open_branches() {
        assert!(can_access(Role::parse("Admin"), "/branches"));
        assert!(can_access(Role::Admin, "/branches/4/holidays"));
    }

    #[test]
    fn test_unknown_role_is_denied_root() {
        assert!(!can_access(Role::parse("Unknown"), "/"));
        assert!(!can_access(Role::Unknown, "/appointment"));
    }

    #[test]
    fn test_unknown_role_reaches_public_rules() {
        assert!(can_access(Role::Unknown, "/auth/login"));
        assert!(is_public_path("/auth"));
        assert!(!is_public_path("/authority"));
    }

    #[test]
    fn test_prefix_requires_separator() {
        // "/doctorsx" must not be caught by the "/doctors" rule, and no other
        // rule covers it.
        assert!(!can_access(Role::Admin, "/doctorsx"));
        assert!(matching_rule("/doctors/").is_some());
    }

    #[test]
    fn test_unmatched_path_is_denied() {
        assert!(!can_access(Role::Admin, "/appointments"));
        assert!(!can_access(Role::Admin, "/unlisted"));
    }

    #[test]
    fn test_records_is_clinical_only() {
        assert!(can_access(Role::Doctor, "/records"));
        assert!(!can_access(Role::Receptionist, "/records"));
    }

    #[test]
    fn test_visible_nav_by_role() {
        let doctor: Vec<_> = visible_nav(Role::Doctor).iter().map(|i| i.url).collect();
        assert!(doctor.contains(&"/records"));
        assert!(!doctor.contains(&"/branches"));

        let admin = visible_nav(Role::Admin);
        assert_eq!(admin.len(), NAV_ITEMS.len());

        assert!(visible_nav(Role::Unknown).is_empty());
    }
}
