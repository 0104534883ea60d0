//! Request admission gate
//!
//! The single decision point the transport layer consults before letting a
//! login attempt reach the auth service. Denials carry a whole-second
//! retry-after value for the response header; admissions carry the remaining
//! token count.

use std::sync::Arc;

use tracing::debug;

use super::bucket::BucketConfig;
use super::registry::RateLimiterRegistry;

/// Admission decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Whole tokens left for this client after the decision
    pub remaining_tokens: u64,

    /// Seconds until a token is available, rounded up; zero when allowed
    pub retry_after_secs: u64,
}

/// Rate limit gate over a bucket registry
pub struct RateLimitGate {
    registry: Arc<RateLimiterRegistry>,
}

impl RateLimitGate {
    /// Create a gate whose buckets use the given parameters
    pub fn new(config: BucketConfig) -> Self {
        Self {
            registry: Arc::new(RateLimiterRegistry::new(config)),
        }
    }

    /// Decide whether a request from `key` may proceed
    ///
    /// Consumes one token from the client's bucket on admission.
    pub fn admit(&self, key: &str) -> Admission {
        let probe = self.registry.resolve(key).try_consume(1);

        if probe.allowed {
            debug!(key = %key, remaining = probe.remaining, "Request admitted");
            Admission {
                allowed: true,
                remaining_tokens: probe.remaining,
                retry_after_secs: 0,
            }
        } else {
            let retry_after_secs = probe
                .retry_after
                .map(|d| d.as_secs_f64().ceil() as u64)
                .unwrap_or(0);
            debug!(
                key = %key,
                retry_after_secs = retry_after_secs,
                "Request rejected by rate limit"
            );
            Admission {
                allowed: false,
                remaining_tokens: probe.remaining,
                retry_after_secs,
            }
        }
    }

    /// The underlying bucket registry
    pub fn registry(&self) -> &Arc<RateLimiterRegistry> {
        &self.registry
    }
}
