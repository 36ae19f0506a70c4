// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video delivery for reelgen.
//!
//! [`DeliveryManager`] picks the transport (remote URL, local file, or relayed
//! file), runs the download and relay steps it needs, and guarantees that the
//! local cache file is removed on every exit path.

pub mod cache;
pub mod download;
pub mod manager;
pub mod relay;

pub use cache::{CacheGuard, CachedVideoFile, sweep_stale};
pub use download::Downloader;
pub use manager::{DeliveryFailure, DeliveryManager};
pub use relay::HttpRelay;
