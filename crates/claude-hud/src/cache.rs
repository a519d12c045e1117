//! Time-windowed memoization for file-backed readers.
//!
//! The config, settings, stats and context-file readers all share one rule: a
//! cached value is served while `now - refreshed_at < ttl`, otherwise it is
//! recomputed and the timestamp moves forward. Execution is single-threaded,
//! so the cache is a plain owned value with no locking.

/// A single cached value with a refresh timestamp.
#[derive(Debug)]
pub struct TtlCache<T> {
    value: Option<T>,
    refreshed_at: i64,
    ttl_ms: i64,
    /// Refresh counter for diagnostics.
    refreshes: u64,
}

impl<T> TtlCache<T> {
    /// Create an empty cache that keeps values for `ttl_ms` milliseconds.
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            value: None,
            refreshed_at: 0,
            ttl_ms,
            refreshes: 0,
        }
    }

    /// Whether a cached value exists and is still inside its window.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.value.is_some() && now_ms - self.refreshed_at < self.ttl_ms
    }

    /// Return the cached value, recomputing it first if it has expired.
    pub fn get_or_refresh(&mut self, now_ms: i64, refresh: impl FnOnce() -> T) -> &T {
        if !self.is_fresh(now_ms) {
            self.value = None;
            self.refreshed_at = now_ms;
            self.refreshes += 1;
        }
        self.value.get_or_insert_with(refresh)
    }

    /// Replace the cached value unconditionally.
    pub fn store(&mut self, now_ms: i64, value: T) -> &T {
        self.refreshed_at = now_ms;
        self.refreshes += 1;
        self.value.insert(value)
    }

    /// Drop the cached value so the next read recomputes it.
    pub fn invalidate(&mut self) {
        self.value = None;
        self.refreshed_at = 0;
    }

    /// Peek at the cached value without refreshing.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// How many times the value has been (re)computed.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
