//! Role and session models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Profile data kept alongside a role's token (nickname, avatar, id, username, ...)
pub type Profile = serde_json::Map<String, serde_json::Value>;

/// The three independently authenticated user classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Patient
    User,
    Doctor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Doctor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    /// Storage key holding the role's token
    pub fn token_key(&self) -> String {
        format!("{}_token", self.as_str())
    }

    /// Storage key holding the role's serialized profile
    pub fn info_key(&self) -> String {
        format!("{}_info", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "patient" => Ok(Role::User),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Other(format!("Unknown role: {}", other))),
        }
    }
}

/// Snapshot of one role's session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Empty when logged out
    pub token: String,
    pub profile: Profile,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Display name from the profile, if any
    pub fn display_name(&self) -> Option<&str> {
        self.profile
            .get("nickname")
            .or_else(|| self.profile.get("username"))
            .and_then(|v| v.as_str())
    }
}

/// Login credentials, shared by all three roles' login endpoints
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload of a successful login: the token plus whatever profile fields the backend sends
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub profile: Profile,
}
