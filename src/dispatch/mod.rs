//! Request dispatch: per-role credentials, envelope unwrapping and expiry handling
//!
//! Every backend call goes through [`Dispatcher::send`]. The request path picks
//! the role (see [`RoleTable::classify`]) whose token is attached under that
//! role's header. Responses are decoded once into an [`Outcome`]; an expired
//! session clears the affected role's store and navigates to its login page,
//! at most once per cool-down window.

pub mod envelope;
pub mod notify;
pub mod redirect;
pub mod request;

pub use envelope::{ApiEnvelope, Outcome, SUCCESS_CODE};
pub use notify::{Level, MemoryNotifier, Notice, Notifier, TracingNotifier};
pub use redirect::RedirectGate;
pub use request::{ApiRequest, Timeout};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{Role, RoleTable, SessionManager};
use crate::config::{ApiConfig, Config, ExpiryPolicy};
use crate::error::{Error, Result};
use crate::router::Router;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// User-facing message for a transport error status
pub fn http_error_message(status: StatusCode) -> String {
    match status.as_u16() {
        403 => "Access denied".to_string(),
        404 => "The requested resource was not found".to_string(),
        500..=599 => "Server error, please try again later".to_string(),
        code => format!("Request failed with status {}", code),
    }
}

pub struct Dispatcher {
    client: reqwest::Client,
    api: ApiConfig,
    roles: RoleTable,
    expired_code: i64,
    expiry_policy: ExpiryPolicy,
    gate: RedirectGate,
    sessions: Arc<SessionManager>,
    router: Arc<Router>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(
        config: &Config,
        sessions: Arc<SessionManager>,
        router: Arc<Router>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api: config.api.clone(),
            roles: RoleTable::new(config.roles.clone()),
            expired_code: config.session.expired_code,
            expiry_policy: config.session.expiry_policy,
            gate: RedirectGate::new(config.session.redirect_cooldown()),
            sessions,
            router,
            notifier,
        })
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Whether an expiry redirect happened within the cool-down window
    pub fn redirect_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Send a request and return the envelope's `data`, decoded as `T`
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let role = self.roles.classify(&request.path);
        let url = self.api.url_for(&request.path);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.timeout_override(request.timeout) {
            builder = builder.timeout(timeout);
        }

        let token = self.sessions.token(role);
        if !token.is_empty() {
            builder = builder.header(self.roles.header(role), token);
        }

        debug!("{} {} as {}", request.method, request.path, role);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.network_failure(e)),
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.session_expired(role));
        }
        if !status.is_success() {
            return Err(self.http_failure(status));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Err(self.network_failure(e)),
        };
        let envelope: ApiEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Malformed response from {}: {}", request.path, e);
                self.notifier
                    .notify(Notice::error("Unexpected response from server"));
                return Err(e.into());
            }
        };

        match Outcome::decode(envelope, self.expired_code) {
            Outcome::Success(data) => Ok(serde_json::from_value(data)?),
            Outcome::AuthExpired => Err(self.session_expired(role)),
            Outcome::BusinessError { code, message } => {
                info!("{} {} failed with code {}: {}", request.method, request.path, code, message);
                self.notifier.notify(Notice::error(message.clone()));
                Err(Error::Business { code, message })
            }
        }
    }

    fn timeout_override(&self, timeout: Timeout) -> Option<Duration> {
        match timeout {
            Timeout::Default => None,
            Timeout::Long => Some(self.api.long_timeout()),
            Timeout::Custom(duration) => Some(duration),
        }
    }

    fn session_expired(&self, request_role: Role) -> Error {
        let role = match self.expiry_policy {
            ExpiryPolicy::Request => request_role,
            ExpiryPolicy::CurrentPage => self.router.current_role(),
        };

        if let Err(e) = self.sessions.store(role).logout() {
            warn!("Failed to clear {} session: {}", role, e);
        }

        if self.gate.try_begin() {
            warn!("{} session expired, redirecting to login", role);
            self.notifier.notify(Notice::warning(SESSION_EXPIRED_MESSAGE));
            if let Err(e) = self.router.navigate(self.roles.login_route(role)) {
                warn!("Failed to navigate to {} login: {}", role, e);
            }
        } else {
            debug!("Expiry redirect for {} suppressed during cool-down", role);
        }

        Error::AuthExpired { role }
    }

    fn http_failure(&self, status: StatusCode) -> Error {
        let message = http_error_message(status);
        warn!("HTTP {}: {}", status.as_u16(), message);
        self.notifier.notify(Notice::error(message.clone()));
        Error::Http {
            status: status.as_u16(),
            message,
        }
    }

    fn network_failure(&self, err: reqwest::Error) -> Error {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else {
            "Network error, please check your connection".to_string()
        };
        warn!("{}: {}", message, err);
        self.notifier.notify(Notice::error(message.clone()));
        Error::Network(message)
    }
}
