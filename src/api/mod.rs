//! Backend endpoints built on the dispatcher

pub mod account;
pub mod dashboard;

pub use account::{login, logout, refresh_profile, register, RegisterRequest};
pub use dashboard::{admin_statistics, generate_report, health_statistics, StatisticsRange};
