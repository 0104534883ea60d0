//! Greedy-refill token bucket
//!
//! Tokens accumulate continuously in proportion to elapsed wall-clock time,
//! capped at the bucket capacity. Refill is a pure function of the previous
//! state and the current instant; the mutex around the state makes each
//! consume atomic, so concurrent callers can never spend more tokens than
//! refill has made available.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token bucket parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    /// Maximum number of tokens the bucket can hold (burst size)
    pub capacity: u64,

    /// Tokens added per refill period
    pub refill_rate: u64,

    /// Length of the refill period
    pub refill_period: Duration,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_rate: 5,
            refill_period: Duration::from_secs(60),
        }
    }
}

/// Result of a consume attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumption {
    /// Whether the requested tokens were consumed
    pub allowed: bool,

    /// Whole tokens left in the bucket after the attempt
    pub remaining: u64,

    /// Time until enough tokens accumulate, set only on denial
    pub retry_after: Option<Duration>,
}

/// Mutable bucket state, guarded by the mutex in `TokenBucket`
#[derive(Debug, Clone, Copy)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// A single client's token bucket
///
/// Created full. Never holds more than `capacity` tokens and never goes
/// negative; consumption is refused when insufficient tokens are available.
#[derive(Debug)]
pub struct TokenBucket {
    config: BucketConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket with the given parameters
    pub fn new(config: BucketConfig) -> Self {
        let state = BucketState {
            tokens: config.capacity as f64,
            last_refill: Instant::now(),
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Try to consume `n` tokens
    pub fn try_consume(&self, n: u64) -> Consumption {
        self.try_consume_at(n, Instant::now())
    }

    /// Try to consume `n` tokens as of the given instant
    ///
    /// Deterministic-time variant of [`try_consume`](Self::try_consume);
    /// lets tests exercise refill behavior without sleeping. Instants in the
    /// past relative to the last refill add no tokens.
    pub fn try_consume_at(&self, n: u64, now: Instant) -> Consumption {
        let mut state = self.state.lock().unwrap();

        let (tokens, last_refill) = refill(&self.config, state.tokens, state.last_refill, now);
        state.last_refill = last_refill;

        if tokens >= n as f64 {
            state.tokens = tokens - n as f64;
            Consumption {
                allowed: true,
                remaining: state.tokens.floor() as u64,
                retry_after: None,
            }
        } else {
            state.tokens = tokens;
            let deficit = n as f64 - tokens;
            let secs_per_token =
                self.config.refill_period.as_secs_f64() / self.config.refill_rate as f64;
            Consumption {
                allowed: false,
                remaining: tokens.floor() as u64,
                retry_after: Some(Duration::from_secs_f64(deficit * secs_per_token)),
            }
        }
    }

    /// How long the bucket has been idle as of `now`
    pub fn idle_for(&self, now: Instant) -> Duration {
        let state = self.state.lock().unwrap();
        now.saturating_duration_since(state.last_refill)
    }

    /// Bucket capacity
    pub fn capacity(&self) -> u64 {
        self.config.capacity
    }
}

/// Pure greedy refill: add `elapsed / period * rate` tokens, capped at
/// capacity, and move the refill timestamp forward.
fn refill(
    config: &BucketConfig,
    tokens: f64,
    last_refill: Instant,
    now: Instant,
) -> (f64, Instant) {
    let elapsed = now.saturating_duration_since(last_refill);
    if elapsed.is_zero() {
        return (tokens, last_refill);
    }

    let added = elapsed.as_secs_f64() / config.refill_period.as_secs_f64()
        * config.refill_rate as f64;
    ((tokens + added).min(config.capacity as f64), now)
}
