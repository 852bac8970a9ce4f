use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medicare::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medicare=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login {
            role,
            username,
            password,
        } => cli::commands::login(role, &username, password).await,
        Commands::Logout { role } => cli::commands::logout(role).await,
        Commands::Status { format } => cli::commands::status(format).await,
        Commands::Navigate { path } => cli::commands::navigate(&path).await,
        Commands::Get { path, params, long } => cli::commands::get(&path, params, long).await,
    }
}
