//! Configuration management for the todoapp server.
//!
//! Settings are resolved in layers, highest priority first:
//!
//! 1. `serve` command-line flags
//! 2. Environment variables (a `.env` file in the working directory is honoured)
//! 3. `config.json` in the platform data directory
//! 4. Compiled defaults
//!
//! ## Environment variables
//!
//! | Variable                  | Setting                          |
//! |---------------------------|----------------------------------|
//! | `TODOAPP_HOST`            | `server.host`                    |
//! | `TODOAPP_PORT`            | `server.port`                    |
//! | `TODOAPP_DB_PATH`         | `database.path`                  |
//! | `TODOAPP_SESSION_TIMEOUT` | `session.idle_timeout_minutes`   |
//! | `TODOAPP_LOG`             | `log_level`                      |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::libs::config::Config;
//!
//! let config = Config::load()?;
//! println!("listening on {}", config.bind_addr());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("invalid value '{value}' for {key} in config.json")]
    InvalidSetting { key: &'static str, value: String },
}

/// HTTP listener settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `None` means `todoapp.db` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle for longer than this are dropped.
    pub idle_timeout_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { idle_timeout_minutes: 720 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads `config.json` from the data directory, or the defaults if there is none.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        if session_timeout(config.session.idle_timeout_minutes).is_none() {
            return Err(ConfigError::InvalidSetting {
                key: "session.idle_timeout_minutes",
                value: config.session.idle_timeout_minutes.to_string(),
            }
            .into());
        }
        Ok(config)
    }

    /// File settings with environment overrides applied.
    pub fn load() -> Result<Config> {
        let _ = dotenv::dotenv();

        let mut config = Self::read()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes `config.json`. Returns `false` if there was nothing to remove.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Overrides settings from environment variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TODOAPP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TODOAPP_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "TODOAPP_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("TODOAPP_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(timeout) = lookup("TODOAPP_SESSION_TIMEOUT") {
            self.session.idle_timeout_minutes = timeout
                .trim()
                .parse()
                .ok()
                .filter(|minutes| session_timeout(*minutes).is_some())
                .ok_or_else(|| ConfigError::InvalidEnv {
                    key: "TODOAPP_SESSION_TIMEOUT",
                    value: timeout.clone(),
                })?;
        }
        if let Some(level) = lookup("TODOAPP_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Db::default_path(),
        }
    }

    /// Fails for values `read` and `apply_env` would have rejected.
    pub fn idle_timeout(&self) -> Result<chrono::Duration, ConfigError> {
        session_timeout(self.session.idle_timeout_minutes).ok_or_else(|| ConfigError::InvalidSetting {
            key: "session.idle_timeout_minutes",
            value: self.session.idle_timeout_minutes.to_string(),
        })
    }

    /// Interactive setup wizard seeded with the current settings.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            Message::ConfigModuleServer.to_string(),
            Message::ConfigModuleDatabase.to_string(),
            Message::ConfigModuleSession.to_string(),
        ];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules)
            .interact()?;

        for selection in selected {
            match selection {
                0 => {
                    msg_print!(Message::ConfigModuleServer);
                    config.server = ServerConfig {
                        host: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerHost.to_string())
                            .default(config.server.host.clone())
                            .interact_text()?,
                        port: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerPort.to_string())
                            .default(config.server.port)
                            .interact_text()?,
                    };
                    config.log_level = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptLogLevel.to_string())
                        .default(config.log_level.clone())
                        .interact_text()?;
                }
                1 => {
                    msg_print!(Message::ConfigModuleDatabase);
                    let current = config.database.path.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(current)
                        .allow_empty(true)
                        .interact_text()?;
                    config.database.path = (!path.trim().is_empty()).then(|| PathBuf::from(path.trim()));
                }
                2 => {
                    msg_print!(Message::ConfigModuleSession);
                    config.session.idle_timeout_minutes = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptSessionTimeout.to_string())
                        .default(config.session.idle_timeout_minutes)
                        .validate_with(|minutes: &u64| match session_timeout(*minutes) {
                            Some(_) => Ok(()),
                            None => Err(Message::InvalidSessionTimeout.to_string()),
                        })
                        .interact_text()?;
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

/// A positive idle timeout that chrono can represent.
fn session_timeout(minutes: u64) -> Option<chrono::Duration> {
    if minutes == 0 {
        return None;
    }
    i64::try_from(minutes).ok().and_then(chrono::Duration::try_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_bind_all_interfaces() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.session.idle_timeout_minutes, 720);
        assert_eq!(config.log_level, "info");
        assert!(config.database.path.is_none());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: Config = serde_json::from_str(r#"{"server": {"host": "127.0.0.1", "port": 9000}}"#).unwrap();
        config
            .apply_env(env(&[("TODOAPP_PORT", "3000"), ("TODOAPP_DB_PATH", "/tmp/t.db"), ("TODOAPP_LOG", "debug")]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.session.idle_timeout_minutes, 720);
    }

    #[test]
    fn invalid_env_value_is_reported() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("TODOAPP_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: "TODOAPP_PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"session": {"idle_timeout_minutes": 5}}"#).unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.idle_timeout(), Ok(chrono::Duration::minutes(5)));
    }

    #[test]
    fn timeout_bounds() {
        assert_eq!(session_timeout(0), None);
        assert_eq!(session_timeout(1), Some(chrono::Duration::minutes(1)));
        assert_eq!(session_timeout(200_000_000_000_000), None);
        assert_eq!(session_timeout(u64::MAX), None);

        let mut config = Config::default();
        config.session.idle_timeout_minutes = 0;
        assert!(matches!(config.idle_timeout(), Err(ConfigError::InvalidSetting { .. })));
    }
}
