// src/backend/utils/rate_limit.rs
use crate::error::CareError;
use crate::models::common::TimestampNs;
use std::cell::RefCell;
use std::collections::HashMap;

/// Call classes with their own bucket configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateScope {
    /// Sign-in attempts, keyed by email.
    SignIn,
    /// Chat posts, keyed by caller.
    ChatPost,
}

impl RateScope {
    fn capacity(self) -> f64 {
        match self {
            RateScope::SignIn => 5.0,
            RateScope::ChatPost => 20.0,
        }
    }

    fn refill_per_sec(self) -> f64 {
        match self {
            RateScope::SignIn => 1.0 / 60.0,
            RateScope::ChatPost => 1.0,
        }
    }
}

/// Upper bound on tracked keys across all scopes.
pub const MAX_TRACKED_KEYS: usize = 10_000;

struct TokenBucket {
    tokens: f64,
    last_refill_time_ns: u64,
}

impl TokenBucket {
    fn new(scope: RateScope, now_ns: u64) -> Self {
        TokenBucket {
            tokens: scope.capacity(),
            last_refill_time_ns: now_ns,
        }
    }

    fn refill(&mut self, scope: RateScope, now_ns: u64) {
        let elapsed_secs = (now_ns.saturating_sub(self.last_refill_time_ns)) as f64 / 1_000_000_000.0;
        let tokens_to_add = elapsed_secs * scope.refill_per_sec();

        self.tokens = (self.tokens + tokens_to_add).min(scope.capacity());
        self.last_refill_time_ns = now_ns;
    }

    /// A bucket back at capacity remembers nothing a fresh one would not.
    fn is_idle(&self, scope: RateScope, now_ns: u64) -> bool {
        let elapsed_secs = (now_ns.saturating_sub(self.last_refill_time_ns)) as f64 / 1_000_000_000.0;
        self.tokens + elapsed_secs * scope.refill_per_sec() >= scope.capacity()
    }

    fn take(&mut self, scope: RateScope, now_ns: u64) -> bool {
        self.refill(scope, now_ns);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

thread_local! {
    // In-memory buckets. Cleared on upgrade.
    static BUCKETS: RefCell<HashMap<(RateScope, String), TokenBucket>> = RefCell::new(HashMap::new());
}

/// Takes one token for `key` in `scope`.
///
/// # Errors
///
/// Returns `CareError::RateLimitExceeded` when the bucket is empty.
pub fn rate_guard(scope: RateScope, key: &str, now_ns: TimestampNs) -> Result<(), CareError> {
    BUCKETS.with(|buckets_refcell| {
        let mut buckets = buckets_refcell.borrow_mut();
        let map_key = (scope, key.to_string());
        if !buckets.contains_key(&map_key) && buckets.len() >= MAX_TRACKED_KEYS {
            buckets.retain(|(s, _), bucket| !bucket.is_idle(*s, now_ns));
            if buckets.len() >= MAX_TRACKED_KEYS {
                log_warn!("Rate limiter full ({} keys); refusing {:?} for {}", buckets.len(), scope, key);
                return Err(CareError::RateLimitExceeded(
                    "Too many requests. Please try again later.".to_string(),
                ));
            }
        }
        let bucket = buckets
            .entry(map_key)
            .or_insert_with(|| TokenBucket::new(scope, now_ns));

        if bucket.take(scope, now_ns) {
            Ok(())
        } else {
            Err(CareError::RateLimitExceeded(format!(
                "Too many {:?} requests for {}. Please try again later.",
                scope, key
            )))
        }
    })
}

/// Forgets buckets that have refilled to capacity. Returns how many were dropped.
pub fn purge_idle_buckets(now_ns: TimestampNs) -> u64 {
    BUCKETS.with(|buckets| {
        let mut buckets = buckets.borrow_mut();
        let before = buckets.len();
        buckets.retain(|(scope, _), bucket| !bucket.is_idle(*scope, now_ns));
        (before - buckets.len()) as u64
    })
}

pub fn tracked_keys() -> usize {
    BUCKETS.with(|buckets| buckets.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: u64 = 1_000_000_000;

    #[test]
    fn sign_in_bucket_empties_and_refills() {
        for _ in 0..5 {
            assert!(rate_guard(RateScope::SignIn, "a@b.co", 0).is_ok());
        }
        assert!(matches!(
            rate_guard(RateScope::SignIn, "a@b.co", 0),
            Err(CareError::RateLimitExceeded(_))
        ));
        // one token per minute
        assert!(rate_guard(RateScope::SignIn, "a@b.co", 60 * SEC).is_ok());
    }

    #[test]
    fn buckets_are_per_key_and_scope() {
        for _ in 0..5 {
            rate_guard(RateScope::SignIn, "a@b.co", 0).unwrap();
        }
        assert!(rate_guard(RateScope::SignIn, "c@d.co", 0).is_ok());
        assert!(rate_guard(RateScope::ChatPost, "a@b.co", 0).is_ok());
    }

    #[test]
    fn refilled_buckets_are_forgotten() {
        rate_guard(RateScope::SignIn, "a@example.com", 0).unwrap();
        rate_guard(RateScope::ChatPost, "alice", 0).unwrap();
        assert_eq!(tracked_keys(), 2);

        // Chat refills in a second, sign-in needs a minute per token.
        assert_eq!(purge_idle_buckets(2 * SEC), 1);
        assert_eq!(tracked_keys(), 1);
        assert_eq!(purge_idle_buckets(61 * SEC), 1);
        assert_eq!(tracked_keys(), 0);
    }

    #[test]
    fn key_count_is_bounded() {
        for i in 0..MAX_TRACKED_KEYS {
            rate_guard(RateScope::SignIn, &format!("user{}@example.com", i), 0).unwrap();
        }
        assert!(matches!(
            rate_guard(RateScope::SignIn, "one-more@example.com", 0),
            Err(CareError::RateLimitExceeded(_))
        ));
        // Known keys keep working while the map is full.
        assert!(rate_guard(RateScope::SignIn, "user0@example.com", 0).is_ok());
        // Once the old buckets refill, new keys are admitted again.
        assert!(rate_guard(RateScope::SignIn, "one-more@example.com", 121 * SEC).is_ok());
        assert_eq!(tracked_keys(), 1);
    }
}
