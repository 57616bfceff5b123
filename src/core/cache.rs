//! Key-value cache abstraction shared by the store backends

use async_trait::async_trait;
use std::time::Duration;

/// A key-value store with optional per-entry TTL.
///
/// Backends must treat their own failures as misses; callers fall back
/// to re-resolving the value.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V>;

    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    async fn remove(&self, key: &K);
}
