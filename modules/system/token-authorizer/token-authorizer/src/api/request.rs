//! `AuthRequest` view over an HTTP request.

use axum::http::{HeaderMap, Uri, header};
use token_authorizer_sdk::{AuthRequest, AuthorizationError};

/// Borrowed headers plus the origin the request was addressed to.
pub struct HttpAuthRequest<'a> {
    headers: &'a HeaderMap,
    base_url: String,
}

impl<'a> HttpAuthRequest<'a> {
    /// The origin comes from an absolute request URI, else from the `Host` header.
    ///
    /// `Host` is taken as sent by the client and is not verified. Do not treat
    /// the resulting base URL as proof that the request came from a local peer.
    #[must_use]
    pub fn new(headers: &'a HeaderMap, uri: &Uri) -> Self {
        Self {
            headers,
            base_url: base_url_of(headers, uri),
        }
    }
}

fn base_url_of(headers: &HeaderMap, uri: &Uri) -> String {
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}");
    }

    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_default()
}

impl AuthRequest for HttpAuthRequest<'_> {
    fn header(&self, name: &str) -> Result<Option<&str>, AuthorizationError> {
        let Some(value) = self.headers.get(name) else {
            return Ok(None);
        };
        value.to_str().map(Some).map_err(|e| {
            AuthorizationError::MalformedRequest(format!("header '{name}' is not valid text: {e}"))
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn base_url_prefers_absolute_uri() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("ignored.example"));
        let uri: Uri = "https://api.example.com:8443/v1/items".parse().unwrap();

        let req = HttpAuthRequest::new(&headers, &uri);
        assert_eq!(req.base_url(), "https://api.example.com:8443");
    }

    #[test]
    fn base_url_falls_back_to_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
        let uri: Uri = "/v1/items".parse().unwrap();

        let req = HttpAuthRequest::new(&headers, &uri);
        assert_eq!(req.base_url(), "http://localhost:3000");
    }

    #[test]
    fn client_sent_host_is_taken_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost"));
        let uri: Uri = "/admin".parse().unwrap();

        let req = HttpAuthRequest::new(&headers, &uri);
        assert_eq!(req.base_url(), "http://localhost");
    }

    #[test]
    fn base_url_is_empty_without_host() {
        let headers = HeaderMap::new();
        let uri: Uri = "/v1/items".parse().unwrap();
        assert_eq!(HttpAuthRequest::new(&headers, &uri).base_url(), "");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let uri = Uri::from_static("/");

        let req = HttpAuthRequest::new(&headers, &uri);
        assert_eq!(req.header("Authorization").unwrap(), Some("Basic abc"));
        assert_eq!(req.header("X-Missing").unwrap(), None);
    }

    #[test]
    fn opaque_header_value_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Basic \xff\xfe").unwrap(),
        );
        let uri = Uri::from_static("/");

        let req = HttpAuthRequest::new(&headers, &uri);
        let err = req.header("Authorization").unwrap_err();
        assert!(matches!(err, AuthorizationError::MalformedRequest(_)));
    }
}
