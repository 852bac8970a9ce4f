//! CLI interface for the MediCare+ client

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::auth::Role;

#[derive(Parser)]
#[command(name = "medicare")]
#[command(version)]
#[command(about = "MediCare+ multi-role session and API client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default medicare.toml configuration file
    Init,

    /// Log in as a role and store its session
    Login {
        /// Role to log in as (user, doctor, admin)
        role: Role,

        #[arg(short, long)]
        username: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "MEDICARE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Log out of a role
    Logout {
        role: Role,
    },

    /// Show the stored session of every role
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve a client route through the navigation guard
    Navigate {
        path: String,
    },

    /// Send a GET request through the dispatcher and print the payload
    Get {
        /// API path, e.g. /admin/department/page
        path: String,

        /// Query parameters as key=value
        #[arg(short, long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Use the extended timeout for long-running calls
        #[arg(long)]
        long: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}
