//! Process-wide wiring of session stores, router and dispatcher

use std::sync::Arc;

use crate::auth::{FileStorage, MemoryStorage, RoleTable, SessionManager, Storage};
use crate::config::Config;
use crate::dispatch::{Dispatcher, Notifier};
use crate::error::Result;
use crate::router::Router;

/// The three cooperating pieces, constructed once and shared
pub struct MedicareClient {
    pub config: Config,
    pub sessions: Arc<SessionManager>,
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl MedicareClient {
    /// Build a client whose sessions persist to the configured storage file
    pub fn open(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let storage = FileStorage::open(&config.session.storage_path)?;
        Self::with_storage(config, Arc::new(storage), notifier)
    }

    /// Build a client whose sessions live only as long as the process
    pub fn in_memory(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()), notifier)
    }

    pub fn with_storage(
        config: Config,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let sessions = Arc::new(SessionManager::new(storage));
        let router = Arc::new(Router::with_default_routes(
            RoleTable::new(config.roles.clone()),
            sessions.clone(),
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            &config,
            sessions.clone(),
            router.clone(),
            notifier,
        )?);

        Ok(Self {
            config,
            sessions,
            router,
            dispatcher,
        })
    }
}
