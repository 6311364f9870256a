//! Outcome hooks for monitoring.

use crate::error::AuthorizationError;

/// How a successful authorization was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizedVia {
    /// Local bypass, no credential involved.
    Bypass,
    /// Fresh record served from the cache.
    CacheHit,
    /// Record fetched from the validator.
    Validated,
}

/// Observer passed to the authorizer at construction.
///
/// Both hooks run synchronously on the request path and must not block.
pub trait AuthorizationObserver: Send + Sync {
    fn on_authorized(&self, _via: AuthorizedVia) {}

    fn on_rejected(&self, _error: &AuthorizationError) {}
}
