// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image-to-video generation over a chat-completions endpoint.
//!
//! [`RequestClient`] sends the prompt and image, retries transient failures
//! under a [`RetryPolicy`](reelgen_core::RetryPolicy), and hands the response
//! body fragment by fragment to a [`ResponseExtractor`], closing the
//! connection as soon as a video URL is recognized.

pub mod client;
pub mod extractor;
pub mod image;
pub mod types;

pub use client::{ProbeReport, RequestClient};
pub use extractor::{ResponseExtractor, Strategy, is_video_url};
