//! Request capability consumed by the authorizer.

use crate::error::AuthorizationError;

/// Name of the header carrying the credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// The parts of an inbound request the authorizer reads.
pub trait AuthRequest: Send + Sync {
    /// Look up a header value by name.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` if the header exists but cannot be read as text.
    fn header(&self, name: &str) -> Result<Option<&str>, AuthorizationError>;

    /// Origin the request was addressed to, e.g. `http://localhost:8080`.
    fn base_url(&self) -> &str;
}

/// Owned request description for embedders without an HTTP stack.
///
/// Header names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl InboundRequest {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Shorthand for `with_header("Authorization", value)`.
    #[must_use]
    pub fn with_authorization(self, value: impl Into<String>) -> Self {
        self.with_header(AUTHORIZATION_HEADER, value)
    }
}

impl AuthRequest for InboundRequest {
    fn header(&self, name: &str) -> Result<Option<&str>, AuthorizationError> {
        Ok(self
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str()))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = InboundRequest::new("http://testing.local")
            .with_header("authorization", "x y");
        assert_eq!(req.header(AUTHORIZATION_HEADER).unwrap(), Some("x y"));
        assert_eq!(req.header("X-Other").unwrap(), None);
        assert_eq!(req.base_url(), "http://testing.local");
    }

    #[test]
    fn first_header_wins() {
        let req = InboundRequest::new("")
            .with_authorization("Basic first")
            .with_authorization("Basic second");
        assert_eq!(
            req.header(AUTHORIZATION_HEADER).unwrap(),
            Some("Basic first")
        );
    }
}
