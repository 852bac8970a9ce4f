//! Per-role session stores

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::models::{Profile, Role, Session};
use crate::auth::storage::Storage;
use crate::error::Result;

const GUEST_NICKNAME: &str = "Guest";

/// Token and profile of a single role, mirrored to storage on every mutation
pub struct SessionStore {
    role: Role,
    storage: Arc<dyn Storage>,
    state: RwLock<Session>,
}

impl SessionStore {
    /// Create a store for `role`, rehydrating from storage
    pub fn new(role: Role, storage: Arc<dyn Storage>) -> Self {
        let token = storage.get(&role.token_key()).unwrap_or_default();
        let profile = storage
            .get(&role.info_key())
            .and_then(|raw| match serde_json::from_str::<Profile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Discarding unreadable {} profile: {}", role, e);
                    None
                }
            })
            .unwrap_or_default();

        Self {
            role,
            storage,
            state: RwLock::new(Session { token, profile }),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Current token, empty if unauthenticated
    pub fn token(&self) -> String {
        self.state.read().token.clone()
    }

    pub fn profile(&self) -> Profile {
        self.state.read().profile.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    // Mutators write storage first and only then update memory, so a failed
    // write leaves the store exactly as it was

    pub fn set_token(&self, token: &str) -> Result<()> {
        let mut state = self.state.write();
        self.storage.set(&self.role.token_key(), token)?;
        state.token = token.to_string();
        Ok(())
    }

    /// Shallow-merge `partial` into the profile; existing keys not in `partial` are kept
    pub fn set_profile(&self, partial: Profile) -> Result<()> {
        let mut state = self.state.write();
        let mut profile = state.profile.clone();
        profile.extend(partial);

        if self.role == Role::User && !has_text(&profile, "nickname") {
            let nickname = profile
                .get("username")
                .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
                .cloned()
                .unwrap_or_else(|| Value::from(GUEST_NICKNAME));
            profile.insert("nickname".to_string(), nickname);
        }

        self.persist_profile(&profile)?;
        state.profile = profile;
        Ok(())
    }

    pub fn update_avatar(&self, url: &str) -> Result<()> {
        let mut state = self.state.write();
        let mut profile = state.profile.clone();
        profile.insert("avatar".to_string(), Value::from(url));
        self.persist_profile(&profile)?;
        state.profile = profile;
        Ok(())
    }

    /// Store the result of a successful login
    pub fn login(&self, token: &str, profile: Profile) -> Result<()> {
        self.set_token(token)?;
        self.set_profile(profile)
    }

    /// Clear token and profile and remove both storage entries
    pub fn logout(&self) -> Result<()> {
        let mut state = self.state.write();
        self.storage.remove(&self.role.token_key())?;
        state.token.clear();
        self.storage.remove(&self.role.info_key())?;
        state.profile.clear();
        Ok(())
    }

    fn persist_profile(&self, profile: &Profile) -> Result<()> {
        let raw = serde_json::to_string(profile)?;
        self.storage.set(&self.role.info_key(), &raw)
    }
}

fn has_text(profile: &Profile, key: &str) -> bool {
    profile
        .get(key)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty())
}

/// The three role stores, constructed once and shared by the router and dispatcher
pub struct SessionManager {
    user: SessionStore,
    doctor: SessionStore,
    admin: SessionStore,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            user: SessionStore::new(Role::User, storage.clone()),
            doctor: SessionStore::new(Role::Doctor, storage.clone()),
            admin: SessionStore::new(Role::Admin, storage),
        }
    }

    pub fn store(&self, role: Role) -> &SessionStore {
        match role {
            Role::User => &self.user,
            Role::Doctor => &self.doctor,
            Role::Admin => &self.admin,
        }
    }

    pub fn token(&self, role: Role) -> String {
        self.store(role).token()
    }

    pub fn is_authenticated(&self, role: Role) -> bool {
        self.store(role).is_authenticated()
    }

    /// Sessions of all roles, in `Role::ALL` order
    pub fn snapshot(&self) -> Vec<(Role, Session)> {
        Role::ALL
            .iter()
            .map(|role| (*role, self.store(*role).snapshot()))
            .collect()
    }
}
