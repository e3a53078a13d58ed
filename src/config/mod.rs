//! Configuration loading and management

use crate::core::error::{ConfigError, ItemServiceError, ItemServiceResult};
use crate::core::validation::BindingFailurePolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable holding the path of the YAML config file
pub const CONFIG_ENV_VAR: &str = "ITEM_SERVICE_CONFIG";

/// Listen address of the HTTP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Which validator the item forms use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStrategy {
    /// The rule table, with rule groups
    #[default]
    Declarative,
    /// The hand-written validator, without rule groups
    Imperative,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub strategy: ValidationStrategy,
    pub binding_failure: BindingFailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// YAML catalog merged over the built-in messages
    pub path: Option<PathBuf>,
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub validation: ValidationConfig,
    pub messages: MessagesConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ItemServiceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ItemServiceResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from the file named by `ITEM_SERVICE_CONFIG`, or use defaults
    pub fn from_env() -> ItemServiceResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                tracing::info!(path = %path, "loading configuration");
                Self::from_yaml_file(path)
            }
            Err(_) => {
                tracing::info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn socket_addr(&self) -> ItemServiceResult<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse::<SocketAddr>().map_err(|_| {
            ItemServiceError::from(ConfigError::ParseError {
                file: None,
                message: format!("invalid listen address '{}'", addr),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.validation.strategy, ValidationStrategy::Declarative);
        assert_eq!(
            config.validation.binding_failure,
            BindingFailurePolicy::SkipFailedFields
        );
        assert!(config.messages.path.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
server:
  port: 3000
validation:
  strategy: imperative
"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.validation.strategy, ValidationStrategy::Imperative);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = AppConfig::default();
        config.validation.binding_failure = BindingFailurePolicy::ShortCircuit;
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let err = AppConfig::from_yaml_str("validation:\n  strategy: magic\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);

        let mut bad = AppConfig::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.socket_addr().is_err());
    }
}
