// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for reelgen.
//!
//! Holds the error taxonomy, the request/response data model shared by the
//! access, provider, delivery, and pipeline crates, and the collaborator
//! traits those crates plug into.

pub mod error;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, ReelgenError};
pub use retry::{Backoff, RetryPolicy};
pub use traits::{FileRelay, MessageSurface, VideoProvider};
pub use types::{
    AccessDecision, AccessReason, DeliveryOutcome, ExtractedMedia, GenerationRequest, GroupId,
    SourceForm, Transport, UserId, VideoReference,
};
