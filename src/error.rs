//! Error types for the MediCare+ client

use thiserror::Error;

use crate::auth::Role;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The backend reported the session for `role` as expired (sentinel code or HTTP 401)
    #[error("Session expired for role '{role}'")]
    AuthExpired { role: Role },

    /// Non-success business code in the response envelope
    #[error("{message}")]
    Business { code: i64, message: String },

    /// Transport-level error status other than 401
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    #[error("Route '{0}' not found")]
    RouteNotFound(String),

    #[error("Navigation to '{0}' exceeded the redirect limit")]
    RedirectLoop(String),

    #[error("Config file not found. Run 'medicare init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the caller has to log in again
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired { .. })
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
