//! Service implementation for the static credential validator.

use std::collections::HashMap;

use serde_json::{Map, Value};
use token_authorizer_sdk::{ValidatedClaims, ValidationError};

use crate::config::{StaticValidatorConfig, ValidatorMode};

/// Static credential validator service.
///
/// Provides token-to-claims mapping based on configuration mode:
/// - `accept_all`: Any non-empty token maps to the default claims
/// - `reject_all`: Every token is rejected
/// - `static_tokens`: Specific tokens map to specific claims
pub struct Service {
    mode: ValidatorMode,
    ttl_ms: Option<i64>,
    default_claims: Map<String, Value>,
    token_map: HashMap<String, Map<String, Value>>,
    reject_reason: String,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticValidatorConfig) -> Self {
        if cfg.mode == ValidatorMode::AcceptAll {
            tracing::warn!(
                "Static validator is running in `accept_all` mode: every credential \
                 is accepted with fixed claims. Do NOT use this mode in production."
            );
        }

        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.claims.clone()))
            .collect();

        tracing::info!(
            mode = ?cfg.mode,
            ttl_ms = ?cfg.ttl_ms,
            token_count = cfg.tokens.len(),
            "Loaded static validator configuration"
        );

        Self {
            mode: cfg.mode.clone(),
            ttl_ms: cfg.ttl_ms.map(|ms| i64::try_from(ms).unwrap_or(i64::MAX)),
            default_claims: cfg.default_claims.clone(),
            token_map,
            reject_reason: cfg.reject_reason.clone(),
        }
    }

    /// Validate a token against the configured mapping.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Unauthorized` if the token is empty, unknown,
    /// or the service is in `reject_all` mode.
    pub fn validate_token(&self, token: &str) -> Result<ValidatedClaims, ValidationError> {
        if token.is_empty() {
            return Err(ValidationError::Unauthorized("empty token".to_owned()));
        }

        let claims = match &self.mode {
            ValidatorMode::AcceptAll => &self.default_claims,
            ValidatorMode::RejectAll => {
                return Err(ValidationError::Unauthorized(self.reject_reason.clone()));
            }
            ValidatorMode::StaticTokens => self
                .token_map
                .get(token)
                .ok_or_else(|| ValidationError::Unauthorized(self.reject_reason.clone()))?,
        };

        Ok(self.build_claims(claims))
    }

    fn build_claims(&self, claims: &Map<String, Value>) -> ValidatedClaims {
        let validated = ValidatedClaims {
            claims: claims.clone(),
            expires: None,
        };
        match self.ttl_ms {
            Some(ttl) => {
                validated.expires_at(chrono::Utc::now().timestamp_millis().saturating_add(ttl))
            }
            None => validated,
        }
    }
}
