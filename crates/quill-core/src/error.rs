//! Domain-level error types.

use thiserror::Error;

/// Message returned to callers whenever a storage failure is swallowed.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Storage failures are logged here and never reach the caller verbatim.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "resource",
                key: String::new(),
            },
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            RepoError::Connection(msg) => {
                tracing::error!(error = %msg, "Database connection error");
                DomainError::Internal(GENERIC_FAILURE.to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!(error = %msg, "Database query error");
                DomainError::Internal(GENERIC_FAILURE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_are_replaced_by_generic_message() {
        let err: DomainError = RepoError::Query("relation \"posts\" does not exist".into()).into();
        match err {
            DomainError::Internal(msg) => assert_eq!(msg, GENERIC_FAILURE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn constraint_violations_surface_as_duplicates() {
        let err: DomainError = RepoError::Constraint("posts_slug_key".into()).into();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn validation_message_joins_all_failures() {
        let err = DomainError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Validation failed: a, b");
    }
}
