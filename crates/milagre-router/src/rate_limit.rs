//! Fixed-window rate limiting
//!
//! Each identifier gets `limit` requests per window. The window opens on the
//! first request and is replaced by a fresh one on the first request after it
//! expires. There is no background sweep: stale entries stay until they are
//! overwritten or reset by hand.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven time for tests
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<u64>>,
}

impl ManualClock {
    /// Start at the given epoch milliseconds
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(Mutex::new(start_ms)),
        }
    }

    /// Move time forward
    pub fn advance_ms(&self, ms: u64) {
        *lock(&self.now) += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        *lock(&self.now)
    }
}

/// Counter for one identifier within its current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests allowed so far in this window
    pub count: u32,
    /// When the window ends (epoch ms)
    pub reset_time: u64,
}

/// Storage for rate-limit counters
///
/// The in-memory store only covers one process; a shared store can be
/// plugged in for deployments with several instances.
pub trait RateLimitStore: Send + Sync {
    /// Apply one request for `key` atomically and return the entry as it
    /// stands afterwards, plus whether the request was allowed
    fn hit(&self, key: &str, limit: u32, window_ms: u64, now_ms: u64) -> (bool, RateLimitEntry);

    /// Forget one key
    fn remove(&self, key: &str);

    /// Forget every key
    fn clear(&self);

    /// Snapshot of all entries
    fn entries(&self) -> Vec<(String, RateLimitEntry)>;
}

/// Process-local store guarded by a mutex
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Rate limiter lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn hit(&self, key: &str, limit: u32, window_ms: u64, now_ms: u64) -> (bool, RateLimitEntry) {
        let mut entries = lock(&self.entries);

        match entries.get_mut(key) {
            Some(entry) if now_ms < entry.reset_time => {
                if entry.count >= limit {
                    return (false, *entry);
                }
                entry.count += 1;
                (true, *entry)
            }
            _ => {
                let entry = RateLimitEntry {
                    count: 1,
                    reset_time: now_ms.saturating_add(window_ms),
                };
                entries.insert(key.to_string(), entry);
                (limit > 0, entry)
            }
        }
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }

    fn clear(&self) {
        lock(&self.entries).clear();
    }

    fn entries(&self) -> Vec<(String, RateLimitEntry)> {
        lock(&self.entries)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}

/// Outcome of a rate-limit check, enough to fill the `X-RateLimit-*` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends (epoch ms)
    pub reset_at: u64,
}

impl RateLimitDecision {
    /// Whole seconds until the window ends, rounded up
    pub fn retry_after_secs(&self, now_ms: u64) -> u64 {
        self.reset_at.saturating_sub(now_ms).div_ceil(1000)
    }
}

/// Counters across all entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStats {
    /// Identifiers currently tracked
    pub total_entries: usize,
    /// Sum of request counts across tracked identifiers
    pub total_requests: u64,
}

/// Rate limiter service, injected into handlers
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// In-memory limiter on the system clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::default()), Arc::new(SystemClock))
    }

    /// Limiter over an arbitrary store and clock
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current time according to the limiter's clock
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Count a request for `identifier` and decide whether it may proceed
    ///
    /// Denied requests do not change the counter.
    pub fn check(&self, identifier: &str, limit: u32, window_ms: u64) -> RateLimitDecision {
        let (allowed, entry) = self.store.hit(identifier, limit, window_ms, self.clock.now_ms());
        if !allowed {
            debug!(identifier, count = entry.count, "Rate limit exceeded");
        }
        RateLimitDecision {
            allowed,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_at: entry.reset_time,
        }
    }

    /// Boolean form of [`RateLimiter::check`]
    pub fn check_rate_limit(&self, identifier: &str, limit: u32, window_ms: u64) -> bool {
        self.check(identifier, limit, window_ms).allowed
    }

    /// Drop the counter for one identifier
    pub fn reset_rate_limit(&self, identifier: &str) {
        self.store.remove(identifier);
    }

    /// Drop every counter
    pub fn clear_all_rate_limits(&self) {
        self.store.clear();
    }

    /// Tracked identifiers and total requests
    pub fn stats(&self) -> RateLimitStats {
        let entries = self.store.entries();
        RateLimitStats {
            total_entries: entries.len(),
            total_requests: entries.iter().map(|(_, e)| e.count as u64).sum(),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").field("stats", &self.stats()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u64 = 1_700_000_000_000;

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new(START);
        let limiter = RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::default()),
            Arc::new(clock.clone()),
        );
        (limiter, clock)
    }

    #[test]
    fn test_allow_allow_deny_then_window_reset() {
        let (limiter, clock) = limiter();

        assert!(limiter.check_rate_limit("user-A", 2, 60_000));
        assert!(limiter.check_rate_limit("user-A", 2, 60_000));
        assert!(!limiter.check_rate_limit("user-A", 2, 60_000));

        clock.advance_ms(60_001);
        assert!(limiter.check_rate_limit("user-A", 2, 60_000));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let (limiter, clock) = limiter();
        assert!(limiter.check_rate_limit("k", 1, 1_000));
        clock.advance_ms(999);
        assert!(!limiter.check_rate_limit("k", 1, 1_000));
        clock.advance_ms(1);
        assert!(limiter.check_rate_limit("k", 1, 1_000));
    }

    #[test]
    fn test_identifiers_are_isolated() {
        let (limiter, _) = limiter();
        assert!(limiter.check_rate_limit("user-A", 1, 60_000));
        assert!(!limiter.check_rate_limit("user-A", 1, 60_000));
        assert!(limiter.check_rate_limit("user-B", 1, 60_000));
    }

    #[test]
    fn test_denied_request_does_not_count() {
        let (limiter, _) = limiter();
        limiter.check("k", 1, 60_000);
        limiter.check("k", 1, 60_000);
        limiter.check("k", 1, 60_000);
        assert_eq!(limiter.stats().total_requests, 1);
    }

    #[test]
    fn test_decision_fields() {
        let (limiter, clock) = limiter();

        let first = limiter.check("k", 3, 60_000);
        assert_eq!(first, RateLimitDecision { allowed: true, limit: 3, remaining: 2, reset_at: START + 60_000 });

        clock.advance_ms(10_000);
        let second = limiter.check("k", 3, 60_000);
        assert_eq!(second.remaining, 1);
        assert_eq!(second.reset_at, START + 60_000);

        limiter.check("k", 3, 60_000);
        let denied = limiter.check("k", 3, 60_000);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after_secs(limiter.now_ms()), 50);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let decision = RateLimitDecision { allowed: false, limit: 1, remaining: 0, reset_at: 10_500 };
        assert_eq!(decision.retry_after_secs(10_000), 1);
        assert_eq!(decision.retry_after_secs(11_000), 0);
    }

    #[test]
    fn test_reset_and_clear() {
        let (limiter, _) = limiter();
        limiter.check("a", 1, 60_000);
        limiter.check("b", 1, 60_000);
        assert_eq!(limiter.stats(), RateLimitStats { total_entries: 2, total_requests: 2 });

        limiter.reset_rate_limit("a");
        assert!(limiter.check_rate_limit("a", 1, 60_000));
        assert!(!limiter.check_rate_limit("b", 1, 60_000));

        limiter.clear_all_rate_limits();
        assert_eq!(limiter.stats().total_entries, 0);
        assert!(limiter.check_rate_limit("b", 1, 60_000));
    }

    #[test]
    fn test_stale_entries_persist_until_overwritten() {
        let (limiter, clock) = limiter();
        limiter.check("old", 5, 1_000);
        clock.advance_ms(5_000);
        assert_eq!(limiter.stats().total_entries, 1);
    }

    #[test]
    fn test_concurrent_checks_respect_limit() {
        let limiter = RateLimiter::in_memory();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50).filter(|_| limiter.check_rate_limit("shared", 100, 60_000)).count()
                })
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 100);
    }
}
