// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request gate combining group control and rate limiting.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use reelgen_config::{AccessConfig, GroupControlMode};
use reelgen_core::{AccessDecision, AccessReason, GroupId, UserId};
use tracing::info;

use crate::rate::RateLimiter;

/// Decides whether a request may proceed.
///
/// Requests without a group (direct messages) bypass both checks.
#[derive(Debug)]
pub struct AccessGuard {
    mode: GroupControlMode,
    allow: HashSet<String>,
    deny: HashSet<String>,
    limiter: Option<RateLimiter>,
    admins: HashSet<String>,
}

impl AccessGuard {
    pub fn new(config: &AccessConfig) -> Self {
        let limiter = config.rate_limit_enabled.then(|| {
            RateLimiter::new(
                Duration::from_secs(config.rate_limit_window_seconds),
                config.rate_limit_max_calls,
            )
        });

        Self {
            mode: config.group_control_mode,
            allow: config.allow_groups.iter().cloned().collect(),
            deny: config.deny_groups.iter().cloned().collect(),
            limiter,
            admins: config.admin_users.iter().cloned().collect(),
        }
    }

    /// Checks the request at the current time, consuming quota if admitted.
    pub fn check(&self, group: Option<&GroupId>, user: &UserId) -> AccessDecision {
        self.check_at(group, user, Instant::now())
    }

    /// Checks the request at `now`, consuming quota if admitted.
    pub fn check_at(&self, group: Option<&GroupId>, user: &UserId, now: Instant) -> AccessDecision {
        let Some(group) = group else {
            return AccessDecision::allow();
        };

        if !self.group_permitted(group) {
            info!(group_id = %group, user_id = %user, mode = ?self.mode, "group refused");
            return AccessDecision::deny(AccessReason::GroupDenied);
        }

        if let Some(limiter) = &self.limiter
            && !limiter.try_acquire_at(group, now)
        {
            info!(group_id = %group, user_id = %user, "group rate limited");
            return AccessDecision::deny(AccessReason::RateLimited);
        }

        AccessDecision::allow()
    }

    /// Group control only; never touches the rate limiter.
    pub fn group_permitted(&self, group: &GroupId) -> bool {
        match self.mode {
            GroupControlMode::Off => true,
            GroupControlMode::Whitelist => self.allow.contains(&group.0),
            GroupControlMode::Blacklist => !self.deny.contains(&group.0),
        }
    }

    pub fn is_admin(&self, user: &UserId) -> bool {
        self.admins.contains(&user.0)
    }

    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.limiter.as_ref()
    }
}
