//! MediCare+ client - multi-role sessions, route guarding and request dispatch
//!
//! Patients (users), doctors and administrators authenticate independently.
//! Each role has its own session store, credential header and login page;
//! the [`dispatch::Dispatcher`] attaches the right credential to every call and
//! sends expired sessions back to the matching login route through the
//! [`router::Router`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod router;

pub use auth::{Role, SessionManager};
pub use client::MedicareClient;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::Error;
pub use router::Router;
