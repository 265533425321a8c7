use crate::schema::{ValidationError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown record kind: {kind}")]
    UnknownKind { kind: String },

    #[error("Unknown collection: {collection}")]
    UnknownCollection { collection: String },

    #[error("Collection {collection} is declared by both {first} and {second}")]
    DuplicateCollection {
        collection: String,
        first: String,
        second: String,
    },

    #[error("Validation failed for {collection}: {errors}")]
    Validation {
        collection: String,
        errors: ValidationErrors,
    },

    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Failed to build {kind} from validated document: {cause}")]
    Deserialize { kind: String, cause: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<ValidationError>>,
}

impl RegistryError {
    /// Stable, machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::UnknownKind { .. } => "unknown_kind",
            RegistryError::UnknownCollection { .. } => "unknown_collection",
            RegistryError::DuplicateCollection { .. } => "duplicate_collection",
            RegistryError::Validation { .. } => "validation_failed",
            RegistryError::InvalidConfig { .. } => "invalid_config",
            RegistryError::Deserialize { .. } => "deserialize_failed",
            RegistryError::Internal(_) => "internal_error",
        }
    }

    /// Render the error in the shape the viewer displays
    pub fn to_response(&self) -> ErrorResponse {
        let (collection, violations) = match self {
            RegistryError::UnknownCollection { collection }
            | RegistryError::DuplicateCollection { collection, .. } => {
                (Some(collection.clone()), None)
            }
            RegistryError::Validation { collection, errors } => {
                (Some(collection.clone()), Some(errors.to_vec()))
            }
            _ => (None, None),
        };

        let message = match self {
            RegistryError::Validation { errors, .. } => format!(
                "Document rejected with {} violation(s)",
                errors.len()
            ),
            other => other.to_string(),
        };

        ErrorResponse {
            error: self.code().to_string(),
            message,
            collection,
            violations,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
