//! Domain service for the token authorizer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use token_authorizer_sdk::{
    AuthRequest, AuthorizationError, AuthorizationObserver, AuthorizationRecord, AuthorizedVia,
    Credential, CredentialFingerprint, CredentialValidator, ValidatedClaims, ValidationError,
};
use tracing::{debug, info};

use super::cache::RecordCache;
use super::extractor::{BypassPolicy, CredentialExtractor, Extraction};
use crate::config::TokenAuthorizerConfig;

/// Token authorizer service.
///
/// Admits a request when its credential maps to a fresh cached record or
/// when the validator accepts it. Concurrent misses for the same credential
/// each call the validator; the last answer to arrive stays cached.
pub struct Service {
    extractor: CredentialExtractor,
    cache: RecordCache,
    validator: Arc<dyn CredentialValidator>,
    validation_timeout: Option<Duration>,
    bypass_record: Arc<AuthorizationRecord>,
    bypass_credential: String,
    observer: RwLock<Option<Arc<dyn AuthorizationObserver>>>,
    in_flight: AtomicUsize,
}

/// Builder for [`Service`].
pub struct ServiceBuilder {
    cfg: TokenAuthorizerConfig,
    validator: Option<Arc<dyn CredentialValidator>>,
    observer: Option<Arc<dyn AuthorizationObserver>>,
}

impl ServiceBuilder {
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn CredentialValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn AuthorizationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the service. Without a validator every credential is rejected.
    #[must_use]
    pub fn build(self) -> Service {
        let cfg = self.cfg;
        let bypass = BypassPolicy::from_config(&cfg.bypass);
        if bypass.is_enabled() {
            tracing::warn!(
                always = cfg.bypass.always,
                prefixes = ?cfg.bypass.trusted_origin_prefixes,
                "Local bypass is enabled: header-less requests from trusted origins \
                 are admitted without validation. Do NOT use this in production."
            );
        }

        let validator = self.validator.unwrap_or_else(|| {
            tracing::warn!("No credential validator configured, every credential will be rejected");
            Arc::new(NoValidator)
        });

        info!(
            scheme = %cfg.scheme,
            max_entries = cfg.effective_max_entries(),
            max_age_ms = u64::try_from(cfg.cache_max_age().as_millis()).unwrap_or(u64::MAX),
            timeout = ?cfg.validation_timeout(),
            "Initializing token authorizer"
        );

        let cache = RecordCache::new(cfg.effective_max_entries(), cfg.cache_max_age());
        let validation_timeout = cfg.validation_timeout();
        let bypass_record = Arc::new(AuthorizationRecord::new(cfg.bypass.claims, i64::MAX));

        Service {
            extractor: CredentialExtractor::new(cfg.scheme, bypass),
            cache,
            validator,
            validation_timeout,
            bypass_record,
            bypass_credential: cfg.bypass.credential,
            observer: RwLock::new(self.observer),
            in_flight: AtomicUsize::new(0),
        }
    }
}

impl Service {
    #[must_use]
    pub fn builder(cfg: TokenAuthorizerConfig) -> ServiceBuilder {
        ServiceBuilder {
            cfg,
            validator: None,
            observer: None,
        }
    }

    #[must_use]
    pub fn new(cfg: TokenAuthorizerConfig, validator: Arc<dyn CredentialValidator>) -> Self {
        Self::builder(cfg).validator(validator).build()
    }

    /// Authorize a request.
    ///
    /// # Errors
    ///
    /// See [`AuthorizationError`]. Validator failures, timeouts and empty
    /// validator answers also remove the credential from the cache.
    #[tracing::instrument(skip_all)]
    pub async fn authorize(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<Arc<AuthorizationRecord>, AuthorizationError> {
        let _slot = InFlightGuard::enter(&self.in_flight);
        let outcome = self.resolve(request).await;
        self.dispatch(outcome)
    }

    /// Number of authorizations currently running. Advisory only.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Approximate number of cached records.
    #[must_use]
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Drop a cached record, e.g. after the embedder learns of a revocation.
    pub fn invalidate(&self, credential: &Credential) {
        self.cache.delete(&credential.fingerprint());
    }

    /// Release cached records and detach the observer.
    ///
    /// The service stays usable; subsequent calls start from an empty cache.
    pub fn close(&self) {
        self.cache.clear();
        self.observer.write().take();
        info!("Token authorizer closed");
    }

    async fn resolve(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<(Arc<AuthorizationRecord>, AuthorizedVia), AuthorizationError> {
        let credential = match self.extractor.extract(request)? {
            Extraction::Bypass => {
                debug!(
                    base_url = request.base_url(),
                    credential = %self.bypass_credential,
                    "Local bypass applied"
                );
                return Ok((self.bypass_record.clone(), AuthorizedVia::Bypass));
            }
            Extraction::Credential(credential) => credential,
        };

        let key = credential.fingerprint();
        if let Some(record) = self.cache.get(&key) {
            if record.is_fresh_at(now_millis()) {
                debug!(credential = %key.short(), "Record served from cache");
                return Ok((record, AuthorizedVia::CacheHit));
            }
            debug!(
                credential = %key.short(),
                expires = record.expires(),
                "Record found but is expired, invalidating it"
            );
            self.cache.delete(&key);
        }

        let record = self.fetch(&credential, key).await?;
        Ok((record, AuthorizedVia::Validated))
    }

    async fn fetch(
        &self,
        credential: &Credential,
        key: CredentialFingerprint,
    ) -> Result<Arc<AuthorizationRecord>, AuthorizationError> {
        debug!(credential = %key.short(), "Calling credential validator");
        let call = self.validator.validate(credential);
        let answer = match self.validation_timeout {
            Some(after) => {
                let Ok(answer) = tokio::time::timeout(after, call).await else {
                    self.cache.delete(&key);
                    return Err(AuthorizationError::ValidationTimedOut { after });
                };
                answer
            }
            None => call.await,
        };

        match answer {
            Ok(Some(claims)) => {
                let record = Arc::new(claims.into_record());
                self.cache.set(key, record.clone());
                Ok(record)
            }
            Ok(None) => {
                self.cache.delete(&key);
                Err(AuthorizationError::ExhaustedNoRecord)
            }
            Err(source) => {
                self.cache.delete(&key);
                Err(AuthorizationError::ValidationFailed { source })
            }
        }
    }

    fn dispatch(
        &self,
        outcome: Result<(Arc<AuthorizationRecord>, AuthorizedVia), AuthorizationError>,
    ) -> Result<Arc<AuthorizationRecord>, AuthorizationError> {
        let observer = self.observer.read().clone();
        match outcome {
            Ok((record, via)) => {
                debug!(?via, "Returning record");
                if let Some(observer) = observer {
                    observer.on_authorized(via);
                }
                Ok(record)
            }
            Err(err) => {
                log_rejection(&err);
                if let Some(observer) = observer {
                    observer.on_rejected(&err);
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl token_authorizer_sdk::TokenAuthorizerClient for Service {
    async fn authorize(
        &self,
        request: &dyn AuthRequest,
    ) -> Result<Arc<AuthorizationRecord>, AuthorizationError> {
        Service::authorize(self, request).await
    }
}

/// Log rejections at appropriate levels.
///
/// Cognitive complexity is inflated by tracing macro expansion.
#[allow(clippy::cognitive_complexity)]
fn log_rejection(err: &AuthorizationError) {
    match err {
        AuthorizationError::ValidationFailed {
            source: ValidationError::Unavailable(_) | ValidationError::Internal(_),
        } => tracing::error!(error = %err, "Credential validator failed"),
        AuthorizationError::ValidationTimedOut { .. } => {
            tracing::error!(error = %err, "Credential validator timed out");
        }
        _ => debug!(error = %err, "Authorization rejected"),
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Used when the embedder supplies no validator.
struct NoValidator;

#[async_trait]
impl CredentialValidator for NoValidator {
    async fn validate(
        &self,
        _credential: &Credential,
    ) -> Result<Option<ValidatedClaims>, ValidationError> {
        Err(ValidationError::Unauthorized(
            "No valid auth call".to_owned(),
        ))
    }
}
