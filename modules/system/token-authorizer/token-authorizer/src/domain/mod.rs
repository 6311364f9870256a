//! Domain layer for the token authorizer.

pub mod cache;
pub mod extractor;
pub mod service;

pub use cache::RecordCache;
pub use extractor::{BypassPolicy, CredentialExtractor, Extraction};
pub use service::{Service, ServiceBuilder};
