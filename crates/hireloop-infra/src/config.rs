//! Configuration loader for hireloop.
//!
//! Reads `config.toml` from the data directory (`~/.hireloop/` by default),
//! then applies environment overrides and attaches secrets. A missing or
//! malformed file falls back to defaults; a malformed environment value is
//! an error.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use hireloop_types::config::{DeploymentMode, FileConfig, HireloopConfig};
use hireloop_types::error::ConfigError;

/// Resolve the data directory.
///
/// `HIRELOOP_DATA_DIR` wins; otherwise `~/.hireloop`, or `./.hireloop` when
/// no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HIRELOOP_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".hireloop");
    }

    PathBuf::from(".hireloop")
}

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`FileConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_file_config(data_dir: &Path) -> FileConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return FileConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return FileConfig::default();
        }
    };

    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            FileConfig::default()
        }
    }
}

/// Layer environment values over file settings.
///
/// `lookup` returns the value of an environment variable; empty values
/// count as unset.
pub fn apply_env<F>(file: FileConfig, lookup: F) -> Result<HireloopConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let mut config = HireloopConfig::from_file(file);

    config.admin_key = var("ADMIN_KEY").map(SecretString::from);
    config.anthropic_api_key = var("ANTHROPIC_API_KEY").map(SecretString::from);

    if let Some(url) = var("HIRING_MANAGER_WEBHOOK") {
        config.hiring_manager_webhook = Some(url);
    }
    if let Some(url) = var("EXAMPLE_APPLICANT_WEBHOOK") {
        config.applicant_webhook = Some(url);
    }
    if let Some(key) = var("EXAMPLE_APPLICANT_KEY") {
        config.applicant.key = Some(key);
    }
    if let Some(mode) = var("HIRELOOP_MODE") {
        config.mode = mode
            .parse::<DeploymentMode>()
            .map_err(|message| ConfigError::Invalid {
                field: "HIRELOOP_MODE",
                message,
            })?;
    }
    if let Some(max_turns) = var("HIRELOOP_MAX_TURNS") {
        config.max_turns = max_turns.trim().parse().map_err(|e| ConfigError::Invalid {
            field: "HIRELOOP_MAX_TURNS",
            message: format!("{e}"),
        })?;
    }

    Ok(config)
}

/// Load the full runtime configuration from `data_dir` and the process environment.
pub async fn load_config(data_dir: &Path) -> Result<HireloopConfig, ConfigError> {
    let file = load_file_config(data_dir).await;
    apply_env(file, |name| std::env::var(name).ok())
}
