//! Client implementation for the static credential validator.
//!
//! Implements `CredentialValidator` using the domain service.

use async_trait::async_trait;
use token_authorizer_sdk::{Credential, CredentialValidator, ValidatedClaims, ValidationError};

use super::service::Service;

#[async_trait]
impl CredentialValidator for Service {
    async fn validate(
        &self,
        credential: &Credential,
    ) -> Result<Option<ValidatedClaims>, ValidationError> {
        self.validate_token(credential.expose()).map(Some)
    }
}
