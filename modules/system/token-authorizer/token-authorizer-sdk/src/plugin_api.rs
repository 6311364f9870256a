//! Validator trait for token authorizer embedders.
//!
//! The authorizer never inspects credentials itself. On a cache miss it hands
//! the raw credential to the validator supplied at construction, typically a
//! client for a remote identity provider.

use async_trait::async_trait;

use crate::error::ValidationError;
use crate::models::{Credential, ValidatedClaims};

/// External credential validator.
///
/// Implementations are called once per cache miss or stale entry. They are
/// not retried and may be called concurrently for the same credential.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validate a credential and return its claims.
    ///
    /// Returning `Ok(None)` means the validator finished without an answer
    /// for this credential; the authorizer treats it as a failed attempt.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the credential is not acceptable
    /// - `Unavailable` if the identity provider cannot be reached
    /// - `Internal` for unexpected errors
    async fn validate(
        &self,
        credential: &Credential,
    ) -> Result<Option<ValidatedClaims>, ValidationError>;
}
