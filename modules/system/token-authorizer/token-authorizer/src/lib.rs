//! Token Authorizer Module
//!
//! Admits inbound requests carrying an `Authorization: <Scheme> <token>`
//! header. Validator answers are cached per credential until either the
//! record's own `expires` passes or the cache evicts it, so repeated
//! requests with the same credential skip the external validator.
//!
//! The [`api`] module provides the axum middleware that turns a rejection
//! into `401 Unauthorized`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;

pub use config::{BypassConfig, TokenAuthorizerConfig};
pub use domain::{Service as TokenAuthorizer, ServiceBuilder as TokenAuthorizerBuilder};
