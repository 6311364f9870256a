//! Configuration for the token authorizer.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "TOKEN_AUTHORIZER_";

const DEFAULT_CACHE_MAX_ENTRIES: u64 = 5000;
const DEFAULT_CACHE_MAX_AGE_MS: u64 = 5 * 60 * 1000;
const DEFAULT_VALIDATION_TIMEOUT_MS: u64 = 10_000;

/// Configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenAuthorizerConfig {
    /// Scheme expected before the token in the `Authorization` header.
    /// Compared case-sensitively.
    pub scheme: String,

    /// Maximum number of cached records. `0` selects the default (5000).
    pub cache_max_entries: u64,

    /// Maximum age of a cached record since insertion, in milliseconds.
    /// `0` selects the default (5 minutes).
    pub cache_max_age_ms: u64,

    /// Upper bound for a single validator call, in milliseconds.
    /// `null` waits indefinitely.
    pub validation_timeout_ms: Option<u64>,

    /// Local/test bypass. Disabled unless explicitly enabled.
    pub bypass: BypassConfig,
}

impl Default for TokenAuthorizerConfig {
    fn default() -> Self {
        Self {
            scheme: "Basic".to_owned(),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_max_age_ms: DEFAULT_CACHE_MAX_AGE_MS,
            validation_timeout_ms: Some(DEFAULT_VALIDATION_TIMEOUT_MS),
            bypass: BypassConfig::default(),
        }
    }
}

impl TokenAuthorizerConfig {
    /// Layer defaults, an optional YAML file and `TOKEN_AUTHORIZER_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or the merged configuration
    /// does not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(
                path.exists(),
                "configuration file {} not found",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid token authorizer configuration")
    }

    #[must_use]
    pub fn effective_max_entries(&self) -> u64 {
        if self.cache_max_entries == 0 {
            DEFAULT_CACHE_MAX_ENTRIES
        } else {
            self.cache_max_entries
        }
    }

    #[must_use]
    pub fn cache_max_age(&self) -> Duration {
        if self.cache_max_age_ms == 0 {
            Duration::from_millis(DEFAULT_CACHE_MAX_AGE_MS)
        } else {
            Duration::from_millis(self.cache_max_age_ms)
        }
    }

    #[must_use]
    pub fn validation_timeout(&self) -> Option<Duration> {
        self.validation_timeout_ms.map(Duration::from_millis)
    }
}

/// Trusted shortcut for local development and tests.
///
/// Applies only to requests without an `Authorization` header. The base URL
/// is derived from request data, so never enable this on a public listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BypassConfig {
    pub enabled: bool,

    /// Bypass every header-less request regardless of origin.
    pub always: bool,

    /// Base URL prefixes treated as local.
    ///
    /// Matched against `AuthRequest::base_url`. Behind the axum middleware a
    /// relative request URI takes its base URL from the client-sent `Host`
    /// header, so any remote client can claim `localhost`. Only enable the
    /// bypass on listeners reachable from the local machine.
    pub trusted_origin_prefixes: Vec<String>,

    /// Credential name reported for bypassed requests.
    pub credential: String,

    /// Claims of the synthesized record.
    pub claims: Map<String, Value>,
}

impl Default for BypassConfig {
    fn default() -> Self {
        let mut claims = Map::new();
        claims.insert("uid".to_owned(), Value::from("localhost"));
        claims.insert("name".to_owned(), Value::from("Local tester"));

        Self {
            enabled: false,
            always: false,
            trusted_origin_prefixes: vec!["http://localhost".to_owned()],
            credential: "TESTTOKEN".to_owned(),
            claims,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = TokenAuthorizerConfig::default();
        assert_eq!(cfg.scheme, "Basic");
        assert_eq!(cfg.effective_max_entries(), 5000);
        assert_eq!(cfg.cache_max_age(), Duration::from_secs(300));
        assert_eq!(cfg.validation_timeout(), Some(Duration::from_secs(10)));
        assert!(!cfg.bypass.enabled);
        assert_eq!(cfg.bypass.claims["uid"], json!("localhost"));
        assert_eq!(cfg.bypass.claims["name"], json!("Local tester"));
    }

    #[test]
    fn zero_sizes_fall_back_to_defaults() {
        let cfg = TokenAuthorizerConfig {
            cache_max_entries: 0,
            cache_max_age_ms: 0,
            ..Default::default()
        };
        assert_eq!(cfg.effective_max_entries(), 5000);
        assert_eq!(cfg.cache_max_age(), Duration::from_secs(300));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: TokenAuthorizerConfig = serde_json::from_value(json!({
            "scheme": "Bearer",
            "validation_timeout_ms": null,
            "bypass": { "enabled": true }
        }))
        .unwrap();

        assert_eq!(cfg.scheme, "Bearer");
        assert_eq!(cfg.validation_timeout(), None);
        assert!(cfg.bypass.enabled);
        assert_eq!(cfg.bypass.trusted_origin_prefixes, vec!["http://localhost"]);
        assert_eq!(cfg.cache_max_age_ms, 300_000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<TokenAuthorizerConfig, _> =
            serde_json::from_value(json!({ "cache_size": 10 }));
        assert!(result.is_err());
    }

    #[test]
    fn load_layers_yaml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "authorizer.yaml",
                "scheme: Bearer\ncache_max_entries: 10\nbypass:\n  credential: DEVTOKEN\n",
            )?;
            jail.set_env("TOKEN_AUTHORIZER_CACHE_MAX_AGE_MS", "1000");
            jail.set_env("TOKEN_AUTHORIZER_BYPASS__ENABLED", "true");

            let cfg = TokenAuthorizerConfig::load(Some(Path::new("authorizer.yaml")))
                .map_err(|e| e.to_string())?;

            assert_eq!(cfg.scheme, "Bearer");
            assert_eq!(cfg.cache_max_entries, 10);
            assert_eq!(cfg.cache_max_age(), Duration::from_secs(1));
            assert!(cfg.bypass.enabled);
            assert_eq!(cfg.bypass.credential, "DEVTOKEN");
            assert_eq!(cfg.bypass.claims["uid"], json!("localhost"));
            Ok(())
        });
    }

    #[test]
    fn load_rejects_missing_file() {
        let result = TokenAuthorizerConfig::load(Some(Path::new("/nonexistent/authorizer.yaml")));
        assert!(result.is_err());
    }
}
