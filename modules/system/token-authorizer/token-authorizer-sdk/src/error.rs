//! Error types for the token authorizer module.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`CredentialValidator`](crate::CredentialValidator) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The credential is unknown, revoked, or otherwise not acceptable.
    #[error("{0}")]
    Unauthorized(String),

    /// The identity provider behind the validator could not be reached.
    #[error("validator unavailable: {0}")]
    Unavailable(String),

    /// An unexpected validator failure.
    #[error("internal validator error: {0}")]
    Internal(String),
}

/// Errors that can occur when authorizing a request.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The request could not be read at all.
    #[error("No valid request: {0}")]
    MalformedRequest(String),

    /// No `Authorization` header and no bypass condition.
    #[error("No authorization header found")]
    MissingCredential,

    /// The header scheme does not match the configured one.
    #[error(
        "Incorrect authorization type found in header, expected '{expected}', found '{found}'"
    )]
    UnsupportedScheme { expected: String, found: String },

    /// Nothing after the scheme.
    #[error("No authorization token found after type")]
    EmptyToken,

    /// The validator rejected the credential or failed.
    #[error("Could not fetch authorization: {source}")]
    ValidationFailed {
        #[source]
        source: ValidationError,
    },

    /// The validator did not answer within the configured timeout.
    #[error("Could not fetch authorization: validator timed out after {after:?}")]
    ValidationTimedOut { after: Duration },

    /// The validator completed without producing a record.
    #[error("Last call: could not authorize")]
    ExhaustedNoRecord,
}

impl AuthorizationError {
    /// Whether the failure was caused by the request itself rather than the validator.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequest(_)
                | Self::MissingCredential
                | Self::UnsupportedScheme { .. }
                | Self::EmptyToken
        )
    }

    /// The validator error wrapped by this failure, if any.
    #[must_use]
    pub fn validation_cause(&self) -> Option<&ValidationError> {
        match self {
            Self::ValidationFailed { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for AuthorizationError {
    fn from(source: ValidationError) -> Self {
        Self::ValidationFailed { source }
    }
}
