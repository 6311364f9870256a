//! Axum middleware and extractor for authorized requests.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use token_authorizer_sdk::{AuthorizationRecord, TokenAuthorizerClient};

use super::request::HttpAuthRequest;

/// Shared state for the authorization middleware.
#[derive(Clone)]
pub struct AuthorizerState {
    pub authorizer: Arc<dyn TokenAuthorizerClient>,
}

impl AuthorizerState {
    #[must_use]
    pub fn new(authorizer: Arc<dyn TokenAuthorizerClient>) -> Self {
        Self { authorizer }
    }
}

/// Authorization middleware.
///
/// On success the record is inserted into the request extensions and the
/// request continues. Any failure ends the request with an empty
/// `401 Unauthorized`.
///
/// ```ignore
/// let app = Router::new()
///     .route("/items", get(list_items))
///     .layer(from_fn_with_state(state, authorize_request));
/// ```
pub async fn authorize_request(
    State(state): State<AuthorizerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = {
        let view = HttpAuthRequest::new(req.headers(), req.uri());
        state.authorizer.authorize(&view).await
    };

    match outcome {
        Ok(record) => {
            tracing::debug!("Request authenticated");
            req.extensions_mut().insert(record);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(error = %err, "Got exception on validating");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

/// Extractor for the record inserted by [`authorize_request`].
#[derive(Debug, Clone)]
pub struct AuthRecord(pub Arc<AuthorizationRecord>);

impl<S> FromRequestParts<S> for AuthRecord
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<AuthorizationRecord>>()
            .cloned()
            .map(AuthRecord)
            .ok_or_else(|| {
                tracing::error!(
                    "AuthorizationRecord not found - authorization middleware not configured"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }
}
