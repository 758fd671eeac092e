//! Error types for the Webling client core.

use thiserror::Error;
use webling_query::QueryError;

/// Result type for core operations.
pub type WeblingResult<T> = Result<T, WeblingError>;

/// Errors that can occur talking to the remote store or using the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeblingError {
    /// Transport failure or unexpected status without an error body.
    #[error("HTTP error{}: {message}", .status.map(|s| format!(" {s}")).unwrap_or_default())]
    HttpStatus {
        /// Response status, if a response was received.
        status: Option<u16>,
        /// Response body or transport message.
        message: String,
    },

    /// The remote store reports that the requested entity does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Error message from the remote store.
        message: String,
    },

    /// The remote store reports a domain error, e.g. a validation failure.
    #[error("API error {status}: {message}")]
    ApiError {
        /// Response status.
        status: u16,
        /// Error message from the remote store.
        message: String,
    },

    /// Response body is not well-formed or has an unexpected shape.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },

    /// The filter query is incomplete or was misused.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Attempt to write or delete a readonly entity.
    #[error("entity {entity_type}{} is readonly", .id.map(|i| format!("/{i}")).unwrap_or_default())]
    ReadonlyViolation {
        /// Entity type.
        entity_type: String,
        /// Entity ID, if persisted.
        id: Option<u64>,
    },

    /// Operation needs a persisted entity but the entity has no ID.
    #[error("entity of type {entity_type} must have an ID")]
    MissingIdentity {
        /// Entity type.
        entity_type: String,
    },

    /// Sort direction is neither `ASC` nor `DESC`.
    #[error("invalid sorting direction \"{direction}\" for property \"{property}\"")]
    InvalidSortDirection {
        /// Property being sorted.
        property: String,
        /// The rejected direction.
        direction: String,
    },

    /// Property datatype is not known to the client.
    #[error("datatype \"{datatype}\" of property \"{property}\" is not supported")]
    UnsupportedDatatype {
        /// Property title.
        property: String,
        /// Datatype tag from the definition.
        datatype: String,
    },

    /// Property name or ID is absent from the entity definition.
    #[error("property {property} does not exist in the {entity_type} definition")]
    UnknownProperty {
        /// Entity type.
        entity_type: String,
        /// Property title or ID.
        property: String,
    },
}

impl WeblingError {
    /// Creates a transport error without a status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a status error.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates an unknown property error.
    pub fn unknown_property(entity_type: impl Into<String>, property: impl ToString) -> Self {
        Self::UnknownProperty {
            entity_type: entity_type.into(),
            property: property.to_string(),
        }
    }

    /// Returns true if the error came from the remote store or the network.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            WeblingError::HttpStatus { .. }
                | WeblingError::NotFound { .. }
                | WeblingError::ApiError { .. }
                | WeblingError::Parse { .. }
        )
    }
}

impl From<serde_json::Error> for WeblingError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
