//! URL namespace classification

use crate::auth::Role;
use crate::config::{RoleBinding, RolesConfig};

/// Maps request URLs and page paths to roles, and roles to their backend contract
#[derive(Debug, Clone)]
pub struct RoleTable {
    roles: RolesConfig,
}

impl RoleTable {
    pub fn new(roles: RolesConfig) -> Self {
        Self { roles }
    }

    pub fn binding(&self, role: Role) -> &RoleBinding {
        self.roles.get(role)
    }

    /// Header name carrying the role's credential
    pub fn header(&self, role: Role) -> &str {
        &self.binding(role).header
    }

    pub fn login_route(&self, role: Role) -> &str {
        &self.binding(role).login_route
    }

    /// Classify an API URL by its namespace prefix; anything not admin or doctor is user
    pub fn classify(&self, url: &str) -> Role {
        [Role::Admin, Role::Doctor]
            .into_iter()
            .find(|role| has_namespace(url, &self.binding(*role).prefix))
            .unwrap_or(Role::User)
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new(RolesConfig::default())
    }
}

/// `/admin` and `/admin/...` are in the `/admin` namespace, `/administrator` is not
fn has_namespace(url: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match url.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?']),
        None => false,
    }
}
