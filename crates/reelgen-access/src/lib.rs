// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access control for reelgen requests.
//!
//! [`AccessGuard`] combines group allow/deny control with a per-group
//! fixed-window call quota. Group control runs first, so a refused group
//! never consumes quota.

pub mod guard;
pub mod rate;

pub use guard::AccessGuard;
pub use rate::{RateLimiter, RateWindow};
