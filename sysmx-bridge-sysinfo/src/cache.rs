//! Caching provider proxy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sysmx_bridge_framework::{AttributeValue, Provider};

/// Wraps a [`Provider`] and keeps each fetched value for a fixed expiry.
///
/// Bridges polled in quick succession then share one underlying read per
/// key. An expiry of zero disables caching. Failed fetches are never cached.
pub struct CachedProvider<P> {
    inner: P,
    expire_ms: AtomicU64,
    entries: Mutex<HashMap<String, (Instant, AttributeValue)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: Provider> CachedProvider<P> {
    pub fn new(inner: P, expire: Duration) -> Self {
        Self {
            inner,
            expire_ms: AtomicU64::new(expire.as_millis() as u64),
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn expire_millis(&self) -> u64 {
        self.expire_ms.load(Ordering::Relaxed)
    }

    /// Change the expiry. Already cached values are judged by the new expiry.
    pub fn set_expire_millis(&self, millis: u64) {
        self.expire_ms.store(millis, Ordering::Relaxed);
        tracing::debug!(expire_ms = millis, "Cache expiry changed");
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached keys, expired or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached value, returning how many were dropped.
    /// Hit and miss counts are kept.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut entries = self.entries();
            let n = entries.len();
            entries.clear();
            n
        };
        tracing::debug!(dropped, "Cache cleared");
        dropped
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, (Instant, AttributeValue)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Provider> Provider for CachedProvider<P> {
    type Error = P::Error;

    fn fetch(&self, key: &str) -> Result<AttributeValue, Self::Error> {
        let expire = Duration::from_millis(self.expire_millis());

        if !expire.is_zero() {
            if let Some((at, value)) = self.entries().get(key) {
                if at.elapsed() < expire {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(value.clone());
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = self.inner.fetch(key)?;

        if !expire.is_zero() {
            self.entries()
                .insert(key.to_string(), (Instant::now(), value.clone()));
        }

        Ok(value)
    }
}
