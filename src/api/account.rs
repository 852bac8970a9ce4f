//! Login, logout, registration and profile endpoints for each role

use serde::Serialize;
use serde_json::Value;

use crate::auth::{LoginRequest, LoginResponse, Profile, Role, Session};
use crate::dispatch::{ApiRequest, Dispatcher};
use crate::error::{Error, Result};

fn login_path(role: Role) -> &'static str {
    match role {
        Role::User => "/user/user/login",
        Role::Doctor => "/doctor/doctor/login",
        Role::Admin => "/admin/admin/login",
    }
}

fn logout_path(role: Role) -> Option<&'static str> {
    match role {
        Role::User => None,
        Role::Doctor => Some("/doctor/doctor/logout"),
        Role::Admin => Some("/admin/admin/logout"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Log in as `role` and store the returned token and profile in that role's session
pub async fn login(dispatcher: &Dispatcher, role: Role, credentials: &LoginRequest) -> Result<Session> {
    let response: LoginResponse = dispatcher.post(login_path(role), credentials).await?;
    if response.token.is_empty() {
        return Err(Error::Other(format!("{} login returned no token", role)));
    }

    let store = dispatcher.sessions().store(role);
    store.login(&response.token, response.profile)?;
    tracing::info!("Logged in as {} ({})", role, credentials.username);
    Ok(store.snapshot())
}

/// Log out of `role`. The local session is cleared even when the backend call fails
pub async fn logout(dispatcher: &Dispatcher, role: Role) -> Result<()> {
    let remote = match logout_path(role) {
        Some(path) if dispatcher.sessions().is_authenticated(role) => {
            dispatcher.send::<Value>(ApiRequest::post(path)).await.map(|_| ())
        }
        _ => Ok(()),
    };

    dispatcher.sessions().store(role).logout()?;
    remote
}

pub async fn register(dispatcher: &Dispatcher, request: &RegisterRequest) -> Result<Value> {
    dispatcher.post("/user/user/register", request).await
}

/// Fetch the role's profile from the backend and merge it into the session
pub async fn refresh_profile(dispatcher: &Dispatcher, role: Role) -> Result<Profile> {
    let store = dispatcher.sessions().store(role);
    let path = match role {
        Role::User => {
            let id = store
                .profile()
                .get("id")
                .map(|id| match id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .ok_or_else(|| Error::Other("No user id in session profile".to_string()))?;
            format!("/user/user/{}", id)
        }
        Role::Doctor => "/doctor/doctor".to_string(),
        Role::Admin => "/admin/admin".to_string(),
    };

    let profile: Profile = dispatcher.get(&path).await?;
    store.set_profile(profile)?;
    Ok(store.profile())
}
