//! Typed error handling for the item service
//!
//! Validation failures are never errors: they are accumulated as data in a
//! [`ValidationResult`](crate::core::validation::ValidationResult). The types
//! here cover the infrastructure around the pipeline.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups of unknown items
//! - [`ConfigError`]: configuration and message catalog loading
//! - [`StorageError`]: repository failures
//! - [`RequestError`]: malformed submissions
//!
//! # Example
//!
//! ```rust,ignore
//! let item = repository
//!     .find_by_id(&id)
//!     .await?
//!     .ok_or(ItemServiceError::Entity(EntityError::NotFound { id }))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum ItemServiceError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Request(#[from] RequestError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ItemServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItemServiceError::Entity(e) => e.status_code(),
            ItemServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ItemServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ItemServiceError::Request(e) => e.status_code(),
            ItemServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ItemServiceError::Entity(e) => e.error_code(),
            ItemServiceError::Config(_) => "CONFIG_ERROR",
            ItemServiceError::Storage(_) => "STORAGE_ERROR",
            ItemServiceError::Request(e) => e.error_code(),
            ItemServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ItemServiceError::Entity(EntityError::NotFound { id }) => {
                Some(serde_json::json!({ "itemId": id.to_string() }))
            }
            ItemServiceError::Request(RequestError::InvalidItemId { id }) => {
                Some(serde_json::json!({ "itemId": id }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ItemServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("item with id '{id}' not found")]
    NotFound { id: Uuid },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ITEM_NOT_FOUND",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {}: {message}", parse_target(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

fn parse_target(file: &Option<String>) -> String {
    match file {
        Some(file) => format!("config file '{}'", file),
        None => "config".to_string(),
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

// =============================================================================
// Request Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Invalid item ID format: '{id}'")]
    InvalidItemId { id: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidItemId { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidItemId { .. } => "INVALID_ITEM_ID",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for ItemServiceError {
    fn from(err: std::io::Error) -> Self {
        ItemServiceError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ItemServiceError {
    fn from(err: serde_yaml::Error) -> Self {
        ItemServiceError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

/// Repository failures arrive as `anyhow::Error`
impl From<anyhow::Error> for ItemServiceError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<EntityError>() {
            Ok(entity) => return ItemServiceError::Entity(entity),
            Err(other) => other,
        };
        match err.downcast::<StorageError>() {
            Ok(storage) => ItemServiceError::Storage(storage),
            Err(other) => ItemServiceError::Internal(other.to_string()),
        }
    }
}

/// A specialized Result type for the item service
pub type ItemServiceResult<T> = Result<T, ItemServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status_and_code() {
        let err: ItemServiceError = EntityError::NotFound { id: Uuid::nil() }.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "ITEM_NOT_FOUND");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_error_response_details() {
        let err = ItemServiceError::Entity(EntityError::NotFound { id: Uuid::nil() });
        let response = err.to_response();
        assert_eq!(response.code, "ITEM_NOT_FOUND");
        assert_eq!(
            response.details.unwrap()["itemId"],
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_invalid_body() {
        let err: ItemServiceError = RequestError::InvalidBody {
            message: "expected value".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileNotFound {
            path: "/etc/items.yaml".to_string(),
        };
        assert!(err.to_string().contains("/etc/items.yaml"));

        let err = ConfigError::ParseError {
            file: Some("app.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse config file 'app.yaml': bad indent");
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{").unwrap_err();
        let err: ItemServiceError = yaml_err.into();
        assert!(matches!(
            err,
            ItemServiceError::Config(ConfigError::ParseError { .. })
        ));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_from_anyhow_keeps_storage_errors() {
        let err: ItemServiceError = anyhow::Error::new(StorageError::LockPoisoned {
            message: "poisoned".to_string(),
        })
        .into();
        assert!(matches!(err, ItemServiceError::Storage(StorageError::LockPoisoned { .. })));

        let err: ItemServiceError = anyhow::Error::new(EntityError::NotFound { id: Uuid::nil() }).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ItemServiceError = anyhow::anyhow!("boom").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_server_errors_map_to_500() {
        let err = ItemServiceError::Storage(StorageError::LockPoisoned {
            message: "poisoned".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");

        let err = ItemServiceError::Internal("missing state".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
