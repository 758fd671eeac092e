//! Error types for the query crate.

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised by misuse of the query DSL.
///
/// These are programming errors in the calling code and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A condition was set on a parameter that already has one.
    #[error("query condition for property \"{property}\" has already been set")]
    ConditionAlreadySet {
        /// Property the parameter is bound to.
        property: String,
    },

    /// A parameter was rendered before any condition was set.
    #[error("missing query condition for property \"{property}\"")]
    ConditionMissing {
        /// Property the parameter is bound to.
        property: String,
    },
}

impl QueryError {
    /// Creates a condition already set error.
    pub fn already_set(property: impl Into<String>) -> Self {
        Self::ConditionAlreadySet {
            property: property.into(),
        }
    }

    /// Creates a condition missing error.
    pub fn missing(property: impl Into<String>) -> Self {
        Self::ConditionMissing {
            property: property.into(),
        }
    }

    /// Returns the property the error refers to.
    pub fn property(&self) -> &str {
        match self {
            Self::ConditionAlreadySet { property } | Self::ConditionMissing { property } => {
                property
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = QueryError::already_set("name");
        assert_eq!(
            err.to_string(),
            "query condition for property \"name\" has already been set"
        );

        let err = QueryError::missing("first name");
        assert!(err.to_string().contains("first name"));
        assert_eq!(err.property(), "first name");
    }
}
