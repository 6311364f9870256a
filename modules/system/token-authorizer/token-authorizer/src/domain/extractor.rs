//! Credential extraction from the `Authorization` header.

use token_authorizer_sdk::{AUTHORIZATION_HEADER, AuthRequest, AuthorizationError, Credential};

use crate::config::BypassConfig;

/// Result of reading a request.
#[derive(Debug)]
pub enum Extraction {
    Credential(Credential),
    /// No header, but the request qualifies for the local bypass.
    Bypass,
}

/// When header-less requests may skip validation.
#[derive(Debug, Clone, Default)]
pub struct BypassPolicy {
    enabled: bool,
    always: bool,
    trusted_origin_prefixes: Vec<String>,
}

impl BypassPolicy {
    #[must_use]
    pub fn from_config(cfg: &BypassConfig) -> Self {
        Self {
            enabled: cfg.enabled,
            always: cfg.always,
            trusted_origin_prefixes: cfg.trusted_origin_prefixes.clone(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn allows(&self, base_url: &str) -> bool {
        self.enabled
            && (self.always
                || self
                    .trusted_origin_prefixes
                    .iter()
                    .any(|prefix| base_url.starts_with(prefix.as_str())))
    }
}

/// Pulls the scheme-tagged credential out of a request.
#[derive(Debug, Clone)]
pub struct CredentialExtractor {
    scheme: String,
    bypass: BypassPolicy,
}

impl CredentialExtractor {
    #[must_use]
    pub fn new(scheme: impl Into<String>, bypass: BypassPolicy) -> Self {
        Self {
            scheme: scheme.into(),
            bypass,
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Read the credential from `request`.
    ///
    /// The header is split on single spaces: the first part must equal the
    /// scheme, the second part is the token.
    ///
    /// # Errors
    ///
    /// `MalformedRequest`, `MissingCredential`, `UnsupportedScheme` or `EmptyToken`.
    pub fn extract(&self, request: &dyn AuthRequest) -> Result<Extraction, AuthorizationError> {
        let header = request
            .header(AUTHORIZATION_HEADER)?
            .filter(|value| !value.is_empty());

        let Some(header) = header else {
            if self.bypass.allows(request.base_url()) {
                return Ok(Extraction::Bypass);
            }
            return Err(AuthorizationError::MissingCredential);
        };

        let mut parts = header.split(' ');
        let scheme = parts.next().unwrap_or_default();
        if scheme != self.scheme {
            return Err(AuthorizationError::UnsupportedScheme {
                expected: self.scheme.clone(),
                found: scheme.to_owned(),
            });
        }

        match parts.next() {
            Some(token) if !token.is_empty() => Ok(Extraction::Credential(Credential::new(token))),
            _ => Err(AuthorizationError::EmptyToken),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use token_authorizer_sdk::InboundRequest;

    use super::*;

    fn extractor() -> CredentialExtractor {
        CredentialExtractor::new("Basic", BypassPolicy::default())
    }

    fn local_bypass(always: bool) -> BypassPolicy {
        BypassPolicy::from_config(&BypassConfig {
            enabled: true,
            always,
            ..BypassConfig::default()
        })
    }

    #[test]
    fn extracts_token_after_scheme() {
        let req = InboundRequest::new("http://testing.local")
            .with_authorization("Basic aWs6dG9rZW4=");
        match extractor().extract(&req).unwrap() {
            Extraction::Credential(c) => assert_eq!(c.expose(), "aWs6dG9rZW4="),
            Extraction::Bypass => panic!("Expected credential"),
        }
    }

    #[test]
    fn extra_parts_are_ignored() {
        let req = InboundRequest::new("")
            .with_authorization("Basic abc trailing");
        match extractor().extract(&req).unwrap() {
            Extraction::Credential(c) => assert_eq!(c.expose(), "abc"),
            Extraction::Bypass => panic!("Expected credential"),
        }
    }

    #[test]
    fn missing_header_is_rejected() {
        let req = InboundRequest::new("http://testing.local");
        let err = extractor().extract(&req).unwrap_err();
        assert!(matches!(err, AuthorizationError::MissingCredential));
    }

    #[test]
    fn empty_header_counts_as_missing() {
        let req = InboundRequest::new("http://testing.local")
            .with_authorization("");
        let err = extractor().extract(&req).unwrap_err();
        assert!(matches!(err, AuthorizationError::MissingCredential));
    }

    #[test]
    fn scheme_comparison_is_case_sensitive() {
        let req = InboundRequest::new("").with_authorization("basic abc");
        match extractor().extract(&req).unwrap_err() {
            AuthorizationError::UnsupportedScheme { expected, found } => {
                assert_eq!(expected, "Basic");
                assert_eq!(found, "basic");
            }
            other => panic!("Expected UnsupportedScheme, got: {other:?}"),
        }
    }

    #[test]
    fn other_scheme_is_rejected() {
        let req = InboundRequest::new("").with_authorization("Bearer abc");
        let err = extractor().extract(&req).unwrap_err();
        assert!(matches!(err, AuthorizationError::UnsupportedScheme { .. }));
    }

    #[test]
    fn scheme_without_token_is_rejected() {
        for header in ["Basic", "Basic ", "Basic  abc"] {
            let req = InboundRequest::new("").with_authorization(header);
            let err = extractor().extract(&req).unwrap_err();
            assert!(
                matches!(err, AuthorizationError::EmptyToken),
                "header {header:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn bypass_applies_to_trusted_origin_only() {
        let extractor = CredentialExtractor::new("Basic", local_bypass(false));

        let local = InboundRequest::new("http://localhost:3000");
        assert!(matches!(
            extractor.extract(&local).unwrap(),
            Extraction::Bypass
        ));

        let remote = InboundRequest::new("http://testing.local");
        assert!(matches!(
            extractor.extract(&remote).unwrap_err(),
            AuthorizationError::MissingCredential
        ));
    }

    #[test]
    fn always_bypass_ignores_origin() {
        let extractor = CredentialExtractor::new("Basic", local_bypass(true));
        let req = InboundRequest::new("https://api.example.com");
        assert!(matches!(
            extractor.extract(&req).unwrap(),
            Extraction::Bypass
        ));
    }

    #[test]
    fn bypass_never_overrides_a_present_header() {
        let extractor = CredentialExtractor::new("Basic", local_bypass(true));
        let req = InboundRequest::new("http://localhost")
            .with_authorization("Bearer abc");
        assert!(matches!(
            extractor.extract(&req).unwrap_err(),
            AuthorizationError::UnsupportedScheme { .. }
        ));
    }

    #[test]
    fn disabled_bypass_ignores_local_origin() {
        let req = InboundRequest::new("http://localhost");
        assert!(matches!(
            extractor().extract(&req).unwrap_err(),
            AuthorizationError::MissingCredential
        ));
    }
}
