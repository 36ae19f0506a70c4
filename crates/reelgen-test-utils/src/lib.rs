// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for reelgen integration tests.
//!
//! # Components
//!
//! - [`MockSurface`] - message surface that captures sent videos and texts
//! - [`MockRelay`] - relay target returning canned paths or failures
//! - [`MockProvider`] - video provider with scripted results
//! - [`fixtures`] - sample images and configuration builders

pub mod fixtures;
pub mod mock_provider;
pub mod mock_relay;
pub mod mock_surface;

pub use mock_provider::MockProvider;
pub use mock_relay::MockRelay;
pub use mock_surface::{MockSurface, SentVideo};
