//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "medicare.toml";

/// Load configuration from medicare.toml, falling back to defaults when none exists
pub fn load_config() -> Result<Config> {
    match find_config_file() {
        Ok(path) => load_config_from_path(&path),
        Err(Error::ConfigNotFound) => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Write a configuration to disk
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; a failure here is a bug in the codebase
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# MediCare+ client configuration

[api]
origin = "${MEDICARE_API_ORIGIN:-http://localhost:8080}"
base_path = "/api"
timeout_secs = 5
# AI report generation and other long-running calls
long_timeout_secs = 60

[session]
storage_path = "./.medicare/storage.json"
redirect_cooldown_ms = 3000
# Business code the backend returns when a token has expired
expired_code = 401
# "current_page": clear the session of the role owning the current page
# "request": clear the session of the failing request's role
expiry_policy = "current_page"

[roles.admin]
prefix = "/admin"
header = "token"
login_route = "/admin/login"

[roles.doctor]
prefix = "/doctor"
header = "authorization"
login_route = "/doctor/login"

[roles.user]
prefix = ""
header = "authentication"
login_route = "/login"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpiryPolicy;

    #[test]
    fn test_env_interpolation() {
        env::set_var("MEDICARE_TEST_VAR", "hello");
        let content = "value = \"${MEDICARE_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("MEDICARE_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, default_config_content()).unwrap();

        let config = load_config_from_path(&path).unwrap();
        let defaults = Config::default();

        assert_eq!(config.api.timeout_secs, defaults.api.timeout_secs);
        assert_eq!(config.api.long_timeout_secs, defaults.api.long_timeout_secs);
        assert_eq!(config.session.expired_code, 401);
        assert_eq!(config.session.expiry_policy, ExpiryPolicy::CurrentPage);
        assert_eq!(config.roles, defaults.roles);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let mut config = Config::default();
        config.session.redirect_cooldown_ms = 500;
        save_config(&config, &path).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        assert_eq!(loaded.session.redirect_cooldown_ms, 500);
    }

    #[test]
    fn test_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/medicare.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }
}
