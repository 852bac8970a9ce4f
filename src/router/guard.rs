//! Navigation guard enforcing per-role authentication

use std::sync::Arc;

use crate::auth::{RoleTable, SessionManager};
use crate::router::routes::MatchedRoute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Runs before every navigation and decides allow/redirect from the session stores
#[derive(Clone)]
pub struct RouteGuard {
    roles: RoleTable,
    sessions: Arc<SessionManager>,
}

impl RouteGuard {
    pub fn new(roles: RoleTable, sessions: Arc<SessionManager>) -> Self {
        Self { roles, sessions }
    }

    /// Public routes are allowed; protected routes need a token for their role,
    /// otherwise the navigation goes to that same role's login page
    pub fn check(&self, to: &MatchedRoute) -> GuardDecision {
        let Some(role) = to.required_role() else {
            return GuardDecision::Allow;
        };

        if self.sessions.is_authenticated(role) {
            GuardDecision::Allow
        } else {
            tracing::debug!("No {} session for {}, redirecting to login", role, to.path());
            GuardDecision::Redirect(self.roles.login_route(role).to_string())
        }
    }
}
