//! Error handling for the orchestrator service
//!
//! This module defines the crate-wide error type and its HTTP mapping.
//! Provider-level failures live in `core::providers::unified_provider`, and
//! the user-visible failover taxonomy in `core::orchestrator::error`.

mod response;

use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for the orchestrator service
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the orchestrator service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider errors surfaced outside of a failover dispatch
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage errors not raised by the database driver
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable code used in HTTP error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Config(_) => "configuration_error",
            ServiceError::Database(_) | ServiceError::Storage(_) => "storage_error",
            ServiceError::Serialization(_) | ServiceError::Yaml(_) => "serialization_error",
            ServiceError::Io(_) | ServiceError::Internal(_) => "internal_error",
            ServiceError::Provider(_) => "provider_error",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::NotFound(_) => "not_found",
        }
    }
}
