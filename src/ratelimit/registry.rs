//! Per-key bucket registry
//!
//! Maps a client key (typically the source IP) to its token bucket. Buckets
//! are created lazily on first access through the map's entry API, so exactly
//! one bucket ever exists per key no matter how many requests race on the
//! first one. All requests carrying the same key share that bucket.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::bucket::{BucketConfig, TokenBucket};

/// Registry of per-client token buckets
pub struct RateLimiterRegistry {
    config: BucketConfig,
    buckets: DashMap<String, Arc<TokenBucket>>,
}

impl RateLimiterRegistry {
    /// Create a registry whose buckets all use the given parameters
    pub fn new(config: BucketConfig) -> Self {
        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    /// Return the bucket for `key`, creating it if absent
    ///
    /// Creation is atomic per key: concurrent first-time callers all receive
    /// the same bucket instance.
    pub fn resolve(&self, key: &str) -> Arc<TokenBucket> {
        self.buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(TokenBucket::new(self.config.clone())))
            .clone()
    }

    /// Drop buckets that have been idle longer than `ttl`
    ///
    /// An evicted key gets a fresh full bucket on its next request, which
    /// only ever grants a client more headroom, never less. Should be called
    /// periodically to bound memory growth.
    pub fn cleanup(&self, ttl: Duration) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| bucket.idle_for(now) < ttl);
    }

    /// Number of tracked client keys
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: New registry is empty
    #[test]
    fn test_new_registry_is_empty() {
        let registry = RateLimiterRegistry::new(BucketConfig::default());
        assert_eq!(registry.bucket_count(), 0);
    }

    // Test 2: resolve creates a bucket lazily and reuses it
    #[test]
    fn test_resolve_creates_and_reuses() {
        let registry = RateLimiterRegistry::new(BucketConfig::default());

        let first = registry.resolve("192.168.1.1");
        let second = registry.resolve("192.168.1.1");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.bucket_count(), 1);
    }

    // Test 3: Different keys get different buckets
    #[test]
    fn test_distinct_keys_distinct_buckets() {
        let registry = RateLimiterRegistry::new(BucketConfig::default());

        let a = registry.resolve("192.168.1.1");
        let b = registry.resolve("192.168.1.2");

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.bucket_count(), 2);
    }

    // Test 4: Shared bucket means shared token budget
    #[test]
    fn test_shared_bucket_shared_budget() {
        let registry = RateLimiterRegistry::new(BucketConfig {
            capacity: 2,
            refill_rate: 1,
            refill_period: Duration::from_secs(3600),
        });

        assert!(registry.resolve("10.0.0.1").try_consume(1).allowed);
        assert!(registry.resolve("10.0.0.1").try_consume(1).allowed);
        assert!(!registry.resolve("10.0.0.1").try_consume(1).allowed);

        // Another key is unaffected
        assert!(registry.resolve("10.0.0.2").try_consume(1).allowed);
    }

    // Test 5: 100 concurrent resolves for one key yield one bucket
    #[test]
    fn test_concurrent_resolve_single_bucket() {
        let registry = Arc::new(RateLimiterRegistry::new(BucketConfig::default()));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || registry.resolve("10.0.0.1")));
        }

        let buckets: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.bucket_count(), 1);
        for bucket in &buckets {
            assert!(Arc::ptr_eq(bucket, &buckets[0]));
        }
    }

    // Test 6: cleanup evicts idle buckets only
    #[test]
    fn test_cleanup_evicts_idle_buckets() {
        let registry = RateLimiterRegistry::new(BucketConfig::default());

        registry.resolve("10.0.0.1");
        registry.resolve("10.0.0.2");
        assert_eq!(registry.bucket_count(), 2);

        // Nothing has been idle for an hour
        registry.cleanup(Duration::from_secs(3600));
        assert_eq!(registry.bucket_count(), 2);

        // Everything has been idle longer than zero
        registry.cleanup(Duration::ZERO);
        assert_eq!(registry.bucket_count(), 0);
    }
}
