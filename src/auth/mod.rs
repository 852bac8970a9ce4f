//! Roles, session stores and their persistent storage

pub mod models;
pub mod roles;
pub mod session;
pub mod storage;

pub use models::{LoginRequest, LoginResponse, Profile, Role, Session};
pub use roles::RoleTable;
pub use session::{SessionManager, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
