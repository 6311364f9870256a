//! Domain models for the token authorizer module.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Expiry applied when the validator does not provide one.
///
/// `0` lies in the past, so such a record is stale on its first re-read.
pub const DEFAULT_EXPIRES: i64 = 0;

/// Bearer credential taken from the `Authorization` header.
///
/// The token is kept in a `SecretString` so `Debug` output never contains it.
#[derive(Debug)]
pub struct Credential {
    token: SecretString,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Raw token value, for handing to the identity provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    /// SHA-256 digest of the token, used as the cache key.
    #[must_use]
    pub fn fingerprint(&self) -> CredentialFingerprint {
        CredentialFingerprint(Sha256::digest(self.expose().as_bytes()).into())
    }
}

/// Stable, non-reversible identifier of a [`Credential`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialFingerprint([u8; 32]);

impl CredentialFingerprint {
    /// Short hex prefix suitable for log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Debug for CredentialFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialFingerprint({})", self.short())
    }
}

/// Resolved authorization for a credential.
///
/// Holds the claims returned by the validator (user id, name, ...) and the
/// epoch-millisecond instant after which the record must be re-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRecord {
    #[serde(flatten)]
    claims: Map<String, Value>,
    expires: i64,
}

impl AuthorizationRecord {
    #[must_use]
    pub fn new(claims: Map<String, Value>, expires: i64) -> Self {
        Self { claims, expires }
    }

    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// String claim, `None` when absent or not a string.
    #[must_use]
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    /// Expiry as epoch milliseconds.
    #[must_use]
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// A record is usable only while its expiry lies strictly after `now_ms`.
    #[must_use]
    pub fn is_fresh_at(&self, now_ms: i64) -> bool {
        self.expires > now_ms
    }
}

/// Partial record produced by a [`CredentialValidator`](crate::CredentialValidator).
///
/// Merged over the default record by the authorizer: a missing `expires`
/// becomes [`DEFAULT_EXPIRES`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatedClaims {
    #[serde(flatten)]
    pub claims: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

impl ValidatedClaims {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an identity-provider JSON answer.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Internal` if `value` is not an object or
    /// `expires` is not an integer.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::Internal(e.to_string()))
    }

    #[must_use]
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn expires_at(mut self, expires_ms: i64) -> Self {
        self.expires = Some(expires_ms);
        self
    }

    #[must_use]
    pub fn into_record(self) -> AuthorizationRecord {
        AuthorizationRecord::new(self.claims, self.expires.unwrap_or(DEFAULT_EXPIRES))
    }
}
