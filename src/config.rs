use crate::constants::{DEFAULT_BACKEND_URL, DEFAULT_BOT_NAME, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::{ParlanceError, ParlanceResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend_url: String,
    pub bot_name: String,
    pub request_timeout_secs: u64,
    /// Overrides the default history file location when set.
    pub history_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            history_path: None,
            log_level: "info".to_string(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config() -> ParlanceResult<()> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path)
            .map_err(|e| ParlanceError::config_error(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&config_str)
            .map_err(|e| ParlanceError::config_error(format!("Failed to parse config: {}", e)))?
    } else {
        let config = Config::default();

        fs::create_dir_all(config_path.parent().unwrap()).map_err(|e| {
            ParlanceError::config_error(format!("Failed to create config directory: {}", e))
        })?;

        let config_str = serde_json::to_string_pretty(&config)
            .map_err(|e| ParlanceError::config_error(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, config_str)
            .map_err(|e| ParlanceError::config_error(format!("Failed to write config file: {}", e)))?;

        config
    };

    // .env / environment override, matching the backend's own dotenv setup
    if let Ok(url) = env::var("PARLANCE_BACKEND_URL") {
        config.backend_url = url;
    }

    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;

    Ok(())
}

fn get_config_path() -> ParlanceResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ParlanceError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("parlance").join("config.json"))
}

fn validate_config(config: &Config) -> ParlanceResult<()> {
    if config.backend_url.is_empty() {
        return Err(ParlanceError::config_error("Backend URL is required"));
    }

    if !config.backend_url.starts_with("http://") && !config.backend_url.starts_with("https://") {
        return Err(ParlanceError::config_error(
            "Backend URL must start with http:// or https://",
        ));
    }

    if config.bot_name.trim().is_empty() {
        return Err(ParlanceError::config_error("Bot name is required"));
    }

    if config.request_timeout_secs == 0 {
        return Err(ParlanceError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

pub fn update_config(updated_config: Config) -> ParlanceResult<()> {
    validate_config(&updated_config)?;

    let config_path = get_config_path()?;
    let config_str = serde_json::to_string_pretty(&updated_config)
        .map_err(|e| ParlanceError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(&config_path, config_str)
        .map_err(|e| ParlanceError::config_error(format!("Failed to write config file: {}", e)))?;

    *CONFIG.write().unwrap() = updated_config;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_empty_url() {
        let mut config = Config::default();
        config.backend_url = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_url_scheme() {
        let mut config = Config::default();
        config.backend_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_zero_timeout() {
        let mut config = Config::default();
        config.request_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
