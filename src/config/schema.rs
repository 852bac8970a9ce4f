//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Role;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub roles: RolesConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin the `/api` reverse proxy forwards to
    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Timeout for ordinary calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for long-running calls such as AI report generation
    #[serde(default = "default_long_timeout_secs")]
    pub long_timeout_secs: u64,
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_long_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            base_path: default_base_path(),
            timeout_secs: default_timeout_secs(),
            long_timeout_secs: default_long_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn long_timeout(&self) -> Duration {
        Duration::from_secs(self.long_timeout_secs)
    }

    /// Full URL for an API path such as `/admin/department/page`
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.origin.trim_end_matches('/'),
            self.base_path.trim_end_matches('/'),
            path
        )
    }
}

/// Session persistence and expiry handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Window during which further expiry redirects are suppressed
    #[serde(default = "default_redirect_cooldown_ms")]
    pub redirect_cooldown_ms: u64,

    /// Business code the backend uses for "authentication expired"
    #[serde(default = "default_expired_code")]
    pub expired_code: i64,

    #[serde(default)]
    pub expiry_policy: ExpiryPolicy,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./.medicare/storage.json")
}

fn default_redirect_cooldown_ms() -> u64 {
    3000
}

fn default_expired_code() -> i64 {
    401
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            redirect_cooldown_ms: default_redirect_cooldown_ms(),
            expired_code: default_expired_code(),
            expiry_policy: ExpiryPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn redirect_cooldown(&self) -> Duration {
        Duration::from_millis(self.redirect_cooldown_ms)
    }
}

/// Which role's session is cleared when a request reports an expired session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// The role owning the page currently displayed
    #[default]
    CurrentPage,
    /// The role whose namespace the failing request belongs to
    Request,
}

/// Per-role backend contract: URL namespace, credential header, login page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleBinding {
    /// URL prefix of the role's API namespace (empty for the fallback role)
    pub prefix: String,

    /// Header carrying the role's token
    pub header: String,

    /// Client route of the role's login page
    pub login_route: String,
}

impl RoleBinding {
    fn new(prefix: &str, header: &str, login_route: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            header: header.to_string(),
            login_route: login_route.to_string(),
        }
    }
}

fn default_admin_binding() -> RoleBinding {
    RoleBinding::new("/admin", "token", "/admin/login")
}

fn default_doctor_binding() -> RoleBinding {
    RoleBinding::new("/doctor", "authorization", "/doctor/login")
}

fn default_user_binding() -> RoleBinding {
    RoleBinding::new("", "authentication", "/login")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RolesConfig {
    #[serde(default = "default_admin_binding")]
    pub admin: RoleBinding,

    #[serde(default = "default_doctor_binding")]
    pub doctor: RoleBinding,

    #[serde(default = "default_user_binding")]
    pub user: RoleBinding,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            admin: default_admin_binding(),
            doctor: default_doctor_binding(),
            user: default_user_binding(),
        }
    }
}

impl RolesConfig {
    /// Get the binding for a role
    pub fn get(&self, role: Role) -> &RoleBinding {
        match role {
            Role::Admin => &self.admin,
            Role::Doctor => &self.doctor,
            Role::User => &self.user,
        }
    }
}
