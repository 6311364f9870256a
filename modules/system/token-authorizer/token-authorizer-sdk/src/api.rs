//! Public API trait for the token authorizer.
//!
//! This trait defines the interface that consumers (request middleware,
//! RPC handlers) use to admit or reject inbound requests. The authorizer
//! implements it and delegates credential checks to the embedder's
//! [`CredentialValidator`](crate::CredentialValidator).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthorizationError;
use crate::models::AuthorizationRecord;
use crate::request::AuthRequest;

/// Public API trait for the token authorizer.
///
/// ```ignore
/// let record = authorizer.authorize(&request).await?;
/// tracing::debug!(uid = ?record.claim("uid"), "request admitted");
/// ```
///
/// The returned record is shared with the authorizer's cache. Callers get
/// read access only.
#[async_trait]
pub trait TokenAuthorizerClient: Send + Sync {
    /// Decide whether `request` is admitted.
    ///
    /// # Errors
    ///
    /// - `MalformedRequest` if the request could not be read
    /// - `MissingCredential`, `UnsupportedScheme`, `EmptyToken` for header problems
    /// - `ValidationFailed` if the validator rejected the credential
    /// - `ValidationTimedOut` if the validator did not answer in time
    /// - `ExhaustedNoRecord` if the validator produced no record
    async fn authorize(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<Arc<AuthorizationRecord>, AuthorizationError>;
}
