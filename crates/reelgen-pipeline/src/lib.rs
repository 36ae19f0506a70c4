// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request orchestration for reelgen.
//!
//! [`Orchestrator`] sequences one request through the access guard, the video
//! provider, and the delivery manager, and turns the result into a single
//! [`PipelineOutcome`] with a user-facing reply.

pub mod inflight;
pub mod messages;
pub mod orchestrator;
pub mod status;

pub use inflight::{InFlightRegistry, InFlightSlot};
pub use messages::user_message;
pub use orchestrator::{Orchestrator, PipelineOutcome};
