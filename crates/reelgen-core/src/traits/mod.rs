// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the seams of the pipeline.
//!
//! All traits use `#[async_trait]` so they can be held as trait objects.

pub mod provider;
pub mod relay;
pub mod surface;

pub use provider::VideoProvider;
pub use relay::FileRelay;
pub use surface::MessageSurface;
