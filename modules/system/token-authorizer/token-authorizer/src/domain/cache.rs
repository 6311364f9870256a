//! Bounded, time-expiring record cache.
//!
//! Entries leave the cache on their own when capacity is exceeded (least
//! recently used first) or when they outlive `max_age`. This is independent
//! of each record's own `expires`, which callers check on every read.

use std::sync::Arc;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use token_authorizer_sdk::{AuthorizationRecord, CredentialFingerprint};

pub struct RecordCache {
    inner: Cache<CredentialFingerprint, Arc<AuthorizationRecord>>,
}

impl RecordCache {
    #[must_use]
    pub fn new(max_entries: u64, max_age: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(max_age)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &CredentialFingerprint) -> Option<Arc<AuthorizationRecord>> {
        self.inner.get(key)
    }

    pub fn set(&self, key: CredentialFingerprint, record: Arc<AuthorizationRecord>) {
        self.inner.insert(key, record);
    }

    pub fn delete(&self, key: &CredentialFingerprint) {
        self.inner.invalidate(key);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of live entries.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending evictions now instead of on the next write.
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }
}
