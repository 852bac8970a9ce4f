//! Client-side routing: route table, navigation guard and current location

pub mod guard;
pub mod routes;

pub use guard::{GuardDecision, RouteGuard};
pub use routes::{default_routes, MatchedRoute, RouteDescriptor, RouteRecord, RouteTable};

use parking_lot::RwLock;
use std::sync::Arc;

use crate::auth::{Role, RoleTable, SessionManager};
use crate::error::{Error, Result};

const APP_NAME: &str = "MediCare+";
const MAX_REDIRECTS: usize = 8;

/// Outcome of a completed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Where the navigation ended up
    pub path: String,
    /// The originally requested path when a redirect happened
    pub redirected_from: Option<String>,
}

#[derive(Debug, Clone)]
struct Location {
    path: String,
    required_role: Option<Role>,
    title: String,
}

/// Tracks the current location and applies the guard on every navigation
pub struct Router {
    routes: RouteTable,
    roles: RoleTable,
    guard: RouteGuard,
    current: RwLock<Location>,
}

impl Router {
    pub fn new(routes: RouteTable, roles: RoleTable, sessions: Arc<SessionManager>) -> Self {
        let guard = RouteGuard::new(roles.clone(), sessions);
        Self {
            routes,
            roles,
            guard,
            current: RwLock::new(Location {
                path: "/".to_string(),
                required_role: None,
                title: APP_NAME.to_string(),
            }),
        }
    }

    /// Router over the MediCare+ route tree
    pub fn with_default_routes(roles: RoleTable, sessions: Arc<SessionManager>) -> Self {
        Self::new(RouteTable::new(default_routes()), roles, sessions)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn current_path(&self) -> String {
        self.current.read().path.clone()
    }

    pub fn document_title(&self) -> String {
        self.current.read().title.clone()
    }

    /// Role owning the current page: the route's required role, else its URL namespace
    pub fn current_role(&self) -> Role {
        let current = self.current.read();
        current
            .required_role
            .unwrap_or_else(|| self.roles.classify(&current.path))
    }

    /// Navigate to `path`, following route redirects and guard redirects
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        let requested = path.to_string();
        let mut target = requested.clone();

        for _ in 0..MAX_REDIRECTS {
            let matched = self
                .routes
                .resolve(&target)
                .ok_or_else(|| Error::RouteNotFound(target.clone()))?;

            if let Some(redirect) = &matched.target().redirect {
                target = redirect.clone();
                continue;
            }

            match self.guard.check(&matched) {
                GuardDecision::Redirect(to) => {
                    target = to;
                }
                GuardDecision::Allow => {
                    self.commit(&matched);
                    let redirected_from = (matched.path() != requested).then(|| requested.clone());
                    return Ok(Navigation {
                        path: matched.into_path(),
                        redirected_from,
                    });
                }
            }
        }

        Err(Error::RedirectLoop(requested))
    }

    fn commit(&self, matched: &MatchedRoute) {
        let mut current = self.current.write();
        current.path = matched.path().to_string();
        current.required_role = matched.required_role();
        if let Some(title) = matched.title() {
            current.title = format!("{} - {}", title, APP_NAME);
        }
        tracing::debug!("Navigated to {}", current.path);
    }
}
