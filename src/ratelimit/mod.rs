//! Per-client login throttling
//!
//! This module provides a greedy-refill token bucket, a registry that lazily
//! creates one shared bucket per client key, and the admission gate the
//! transport layer consults before a login attempt reaches the auth service.

pub mod bucket;
pub mod gate;
pub mod registry;

pub use bucket::{BucketConfig, Consumption, TokenBucket};
pub use gate::{Admission, RateLimitGate};
pub use registry::RateLimiterRegistry;
