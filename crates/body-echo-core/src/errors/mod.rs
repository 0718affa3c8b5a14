// ABOUTME: Unified error types and error codes shared by every Body Echo crate
// ABOUTME: Defines AppError, ErrorCode, ErrorContext and the AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Unified Error Handling System
//!
//! Every operation in the core returns `AppResult<T>`. Pure computations fail only on
//! invalid input (`InvalidIdentity`, `InvalidGoal`, `InvalidPointsDelta`); store-backed
//! operations additionally surface `ResourceNotFound`, `MergeConflict` and storage
//! failures unchanged. Nothing in the core retries.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1000-1999)
    /// No authenticated identity is available
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials were rejected by the authentication collaborator
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,

    // Validation (3000-3999)
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Empty or malformed identity passed to the anonymizer
    #[serde(rename = "INVALID_IDENTITY")]
    InvalidIdentity = 3001,
    /// Non-positive goal used as a progress denominator
    #[serde(rename = "INVALID_GOAL")]
    InvalidGoal = 3002,
    /// Non-positive points award
    #[serde(rename = "INVALID_POINTS_DELTA")]
    InvalidPointsDelta = 3003,

    // Resource Management (4000-4999)
    /// A record required by the operation does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// A record with the same identifier already exists
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 4001,
    /// The store could not honor its atomic merge/create contract
    #[serde(rename = "MERGE_CONFLICT")]
    MergeConflict = 4002,

    // Configuration (6000-6999)
    /// Configuration value is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Storage backend failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Stored data could not be decoded
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9002,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "You need to sign in to continue",
            Self::AuthInvalid => "The provided credentials are invalid",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidIdentity => "The account identity is missing or malformed",
            Self::InvalidGoal => "Goal values must be greater than zero",
            Self::InvalidPointsDelta => "Points awards must be greater than zero",
            Self::ResourceNotFound => "The requested record was not found",
            Self::ResourceAlreadyExists => "A record with this identifier already exists",
            Self::MergeConflict => "The record was changed concurrently, please try again",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Storage operation failed",
            Self::SerializationError => "Stored data could not be read",
        }
    }

    /// Whether the user can retry the triggering action
    ///
    /// No core error is fatal to the process; configuration errors are the only
    /// ones that need operator intervention rather than a user retry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigInvalid)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Pseudonymous owner key if available (never the external auth id)
    pub owner_key: Option<String>,
    /// Resource identifier if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            owner_key: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the pseudonymous owner key to the error context
    #[must_use]
    pub fn with_owner_key(mut self, owner_key: impl Into<String>) -> Self {
        self.context.owner_key = Some(owner_key.into());
        self
    }

    /// Attach a resource identifier to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the user can retry the triggering action
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }

    /// Generic message suitable for showing to an end user
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.code.description()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "No signed-in identity")
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Empty or malformed identity
    #[must_use]
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidIdentity, message)
    }

    /// Non-positive progress denominator
    #[must_use]
    pub fn invalid_goal(goal: f64) -> Self {
        Self::new(
            ErrorCode::InvalidGoal,
            format!("goal must be a positive finite number, got {goal}"),
        )
        .with_details(serde_json::json!({ "goal": goal }))
    }

    /// Non-positive points award
    #[must_use]
    pub fn invalid_points_delta(delta: i64) -> Self {
        Self::new(
            ErrorCode::InvalidPointsDelta,
            format!("points delta must be greater than zero, got {delta}"),
        )
        .with_details(serde_json::json!({ "delta": delta }))
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Resource already exists
    #[must_use]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceAlreadyExists,
            format!("{} already exists", resource.into()),
        )
    }

    /// Atomic merge/create contract violated
    #[must_use]
    pub fn merge_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MergeConflict, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::not_found("Record");
        }
        let message = error.to_string();
        if matches!(
            error,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)
        ) {
            Self::serialization(message).with_source(error)
        } else {
            Self::database(message).with_source(error)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}
