//! Configuration for the static credential validator.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticValidatorConfig {
    /// Validation mode.
    pub mode: ValidatorMode,

    /// Lifetime given to returned claims, in milliseconds.
    ///
    /// `None` leaves `expires` unset, so the authorizer re-validates the
    /// credential on every request.
    pub ttl_ms: Option<u64>,

    /// Claims returned in `accept_all` mode.
    pub default_claims: Map<String, Value>,

    /// Static token-to-claims mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,

    /// Rejection message for `reject_all` mode and unknown tokens.
    pub reject_reason: String,
}

impl Default for StaticValidatorConfig {
    fn default() -> Self {
        Self {
            mode: ValidatorMode::RejectAll,
            ttl_ms: None,
            default_claims: Map::new(),
            tokens: Vec::new(),
            reject_reason: "No valid auth call".to_owned(),
        }
    }
}

/// Validation mode.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorMode {
    /// Accept any non-empty token and return the default claims.
    AcceptAll,
    /// Reject every token.
    #[default]
    RejectAll,
    /// Map specific tokens to specific claims.
    StaticTokens,
}

/// Maps a static token to the claims returned for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The credential value to match.
    pub token: String,
    /// Claims returned when this token is presented.
    #[serde(default)]
    pub claims: Map<String, Value>,
}
