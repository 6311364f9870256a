#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Credential Validator Plugin
//!
//! This plugin provides a `CredentialValidator` with static token-to-claims
//! mapping for development and testing.
//!
//! ## Modes
//!
//! - **`reject_all`** (default): Rejects every credential. This is what an
//!   authorizer without a real identity provider should do.
//!
//! - **`accept_all`**: Accepts any non-empty token and returns the configured
//!   default claims.
//!
//! - **`static_tokens`**: Maps specific tokens to specific claims. Useful for
//!   end-to-end tests with distinct users.
//!
//! ## Configuration
//!
//! ```yaml
//! mode: static_tokens
//! ttl_ms: 3600000
//! tokens:
//!   - token: "aWs6dG9rZW4="
//!     claims:
//!       uid: "ik"
//!       name: "ik"
//! ```

pub mod config;
pub mod domain;

pub use config::{StaticValidatorConfig, TokenMapping, ValidatorMode};
pub use domain::Service as StaticValidator;
