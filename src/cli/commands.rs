//! CLI command implementations

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::api;
use crate::auth::{LoginRequest, Role, Session};
use crate::cli::{info, print_session_table, success, warn, ConsoleNotifier, OutputFormat};
use crate::client::MedicareClient;
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::dispatch::ApiRequest;

fn open_client() -> Result<MedicareClient> {
    let config = config::load_config()?;
    Ok(MedicareClient::open(config, Arc::new(ConsoleNotifier))?)
}

/// Write a default medicare.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;
    success(&format!("Created {}", CONFIG_FILENAME));
    Ok(())
}

pub async fn login(role: Role, username: &str, password: Option<String>) -> Result<()> {
    let client = open_client()?;

    let password = match password {
        Some(password) => password,
        None => dialoguer::Password::new()
            .with_prompt(format!("{} password for {}", role, username))
            .interact()?,
    };

    let credentials = LoginRequest {
        username: username.to_string(),
        password,
    };
    let session = api::login(&client.dispatcher, role, &credentials).await?;

    success(&format!(
        "Logged in as {} {}",
        role,
        session.display_name().unwrap_or(username)
    ));
    Ok(())
}

pub async fn logout(role: Role) -> Result<()> {
    let client = open_client()?;

    if !client.sessions.is_authenticated(role) {
        info(&format!("Not logged in as {}", role));
        return Ok(());
    }

    let remote = api::logout(&client.dispatcher, role).await;
    success(&format!("Logged out of {}", role));
    if let Err(e) = remote {
        warn(&format!("Backend logout failed: {}", e));
    }
    Ok(())
}

pub async fn status(format: OutputFormat) -> Result<()> {
    let client = open_client()?;
    let sessions = client.sessions.snapshot();
    let by_role: BTreeMap<String, &Session> = sessions
        .iter()
        .map(|(role, session)| (role.to_string(), session))
        .collect();

    match format {
        OutputFormat::Table => print_session_table(&sessions),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&by_role)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&by_role)?),
    }
    Ok(())
}

pub async fn navigate(path: &str) -> Result<()> {
    let client = open_client()?;
    let navigation = client.router.navigate(path)?;

    match &navigation.redirected_from {
        Some(from) => warn(&format!("{} redirected to {}", from, navigation.path)),
        None => success(&format!("Allowed {}", navigation.path)),
    }
    info(&client.router.document_title());
    Ok(())
}

pub async fn get(path: &str, params: Vec<(String, String)>, long: bool) -> Result<()> {
    let client = open_client()?;

    let mut request = ApiRequest::get(path);
    for (key, value) in params {
        request = request.query(&key, value);
    }
    if long {
        request = request.long_running();
    }

    let payload: serde_json::Value = client.dispatcher.send(request).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
