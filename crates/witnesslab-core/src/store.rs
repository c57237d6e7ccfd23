//! Device-local key-value store abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// A namespaced string key-value store.
///
/// Callers treat every failure as "no prior state"; the store is
/// best-effort and never authoritative.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
