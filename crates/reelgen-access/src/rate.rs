// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-group fixed-window call counters.
//!
//! Counters live in memory only and reset on restart.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use reelgen_core::GroupId;
use tracing::debug;

/// Call counter for one group.
#[derive(Debug, Clone)]
pub struct RateWindow {
    pub group_id: GroupId,
    pub window_start: Instant,
    pub call_count: u32,
    pub window: Duration,
    pub max_calls: u32,
}

impl RateWindow {
    fn new(group_id: GroupId, now: Instant, window: Duration, max_calls: u32) -> Self {
        Self {
            group_id,
            window_start: now,
            call_count: 0,
            window,
            max_calls,
        }
    }

    fn is_elapsed(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) >= self.window
    }

    /// Resets an elapsed window, then admits the call if a slot is left.
    fn try_admit(&mut self, now: Instant) -> bool {
        if self.is_elapsed(now) {
            self.window_start = now;
            self.call_count = 0;
        }
        if self.call_count >= self.max_calls {
            return false;
        }
        self.call_count += 1;
        true
    }
}

/// Table of [`RateWindow`]s keyed by group.
///
/// Check-and-increment happens while holding the map shard's write lock, so
/// concurrent requests for one group are serialized and can never both take
/// the last slot. Unrelated groups on other shards do not contend.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_calls: u32,
    windows: DashMap<GroupId, RateWindow>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_calls: u32) -> Self {
        Self {
            window,
            max_calls,
            windows: DashMap::new(),
        }
    }

    /// Admits or refuses one call for `group` at the current time.
    pub fn try_acquire(&self, group: &GroupId) -> bool {
        self.try_acquire_at(group, Instant::now())
    }

    /// Admits or refuses one call for `group` at `now`.
    pub fn try_acquire_at(&self, group: &GroupId, now: Instant) -> bool {
        let mut entry = self
            .windows
            .entry(group.clone())
            .or_insert_with(|| RateWindow::new(group.clone(), now, self.window, self.max_calls));
        let admitted = entry.try_admit(now);
        debug!(
            group_id = %group,
            call_count = entry.call_count,
            max_calls = self.max_calls,
            admitted,
            "rate window checked"
        );
        admitted
    }

    /// Calls still available to `group` in its current window.
    pub fn remaining_at(&self, group: &GroupId, now: Instant) -> u32 {
        match self.windows.get(group) {
            Some(w) if !w.is_elapsed(now) => self.max_calls.saturating_sub(w.call_count),
            _ => self.max_calls,
        }
    }

    /// Drops windows that have fully elapsed. Returns how many were removed.
    pub fn prune_expired_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| !w.is_elapsed(now));
        before - self.windows.len()
    }

    pub fn tracked_groups(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn group(id: &str) -> GroupId {
        GroupId(id.to_string())
    }

    #[test]
    fn admits_exactly_max_calls_per_window() {
        let limiter = RateLimiter::new(Duration::from_secs(3600), 5);
        let g = group("g1");
        let t0 = Instant::now();

        for i in 0..5 {
            assert!(limiter.try_acquire_at(&g, t0 + Duration::from_secs(i)), "call {i}");
        }
        assert!(!limiter.try_acquire_at(&g, t0 + Duration::from_secs(10)));
        assert_eq!(limiter.remaining_at(&g, t0 + Duration::from_secs(10)), 0);

        // Once the window has elapsed the counter starts over.
        assert!(limiter.try_acquire_at(&g, t0 + Duration::from_secs(3600)));
        assert_eq!(limiter.remaining_at(&g, t0 + Duration::from_secs(3600)), 4);
    }

    #[test]
    fn groups_are_counted_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let t0 = Instant::now();
        assert!(limiter.try_acquire_at(&group("a"), t0));
        assert!(limiter.try_acquire_at(&group("b"), t0));
        assert!(!limiter.try_acquire_at(&group("a"), t0));
    }

    #[test]
    fn concurrent_callers_never_exceed_quota() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(3600), 5));
        let admitted = Arc::new(AtomicU32::new(0));
        let t0 = Instant::now();

        std::thread::scope(|s| {
            for _ in 0..64 {
                let limiter = Arc::clone(&limiter);
                let admitted = Arc::clone(&admitted);
                s.spawn(move || {
                    if limiter.try_acquire_at(&group("busy"), t0) {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn prune_removes_only_elapsed_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let t0 = Instant::now();
        limiter.try_acquire_at(&group("old"), t0);
        limiter.try_acquire_at(&group("new"), t0 + Duration::from_secs(30));

        assert_eq!(limiter.prune_expired_at(t0 + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_groups(), 1);
    }
}
