#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Token Authorizer SDK
//!
//! This crate provides the public API for the `token_authorizer` module:
//!
//! - [`TokenAuthorizerClient`] - Public API trait for consumers
//! - [`CredentialValidator`] - Validator trait supplied by the embedder
//! - [`AuthorizationObserver`] - Optional hook notified of every outcome
//! - [`AuthRequest`] / [`InboundRequest`] - Request capability read by the authorizer
//! - [`AuthorizationRecord`] / [`ValidatedClaims`] - Authorization result models
//! - [`AuthorizationError`] / [`ValidationError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use token_authorizer_sdk::{InboundRequest, TokenAuthorizerClient};
//!
//! let request = InboundRequest::new("https://api.example.com")
//!     .with_header("Authorization", "Basic aWs6dG9rZW4=");
//!
//! let record = authorizer.authorize(&request).await?;
//! let name = record.claim("name");
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod observer;
pub mod plugin_api;
pub mod request;

// Re-export main types at crate root
pub use api::TokenAuthorizerClient;
pub use error::{AuthorizationError, ValidationError};
pub use models::{AuthorizationRecord, Credential, CredentialFingerprint, ValidatedClaims};
pub use observer::{AuthorizationObserver, AuthorizedVia};
pub use plugin_api::CredentialValidator;
pub use request::{AUTHORIZATION_HEADER, AuthRequest, InboundRequest};
