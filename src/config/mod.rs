//! Configuration management
//!
//! This module handles loading and validation of the service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the config file to load
pub const CONFIG_PATH_ENV: &str = "FINTRACK_CONFIG";

/// Main configuration struct for the service
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Request analytics configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_all()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration: file named by `FINTRACK_CONFIG` if set, defaults
    /// otherwise, then environment overrides (`HOST`, `PORT`, `JWT_SECRET`).
    pub async fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path).await?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides();
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    /// Validate the entire configuration
    pub fn validate_all(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| AppError::Config(format!("Server config error: {}", e)))?;
        self.auth
            .validate()
            .map_err(|e| AppError::Config(format!("Auth config error: {}", e)))?;
        self.monitoring
            .validate()
            .map_err(|e| AppError::Config(format!("Monitoring config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
server:
  host: "127.0.0.1"
  port: 5000

auth:
  jwt_secret: "test-secret-that-is-at-least-32-characters-long"
  token_ttl_secs: 3600

monitoring:
  recent_requests_capacity: 100
  recent_errors_capacity: 50
  user_activity_capacity: 20
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.monitoring.recent_requests_capacity, 100);
    }

    #[tokio::test]
    async fn test_config_from_file_partial() {
        // Omitted sections fall back to defaults
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"server:\n  port: 9000\n")
            .unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.monitoring.recent_errors_capacity, 50);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = Config::default();
        config.auth.jwt_secret = "too-short".to_string();
        assert!(config.validate_all().is_err());
    }
}
