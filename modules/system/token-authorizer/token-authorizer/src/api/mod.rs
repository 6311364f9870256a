//! HTTP glue: request adapter, middleware and extractor.

pub mod middleware;
pub mod request;

pub use middleware::{AuthRecord, AuthorizerState, authorize_request};
pub use request::HttpAuthRequest;
