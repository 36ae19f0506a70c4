// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for reelgen.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::types::AccessReason;

/// The error type used across every reelgen stage.
#[derive(Debug, Error)]
pub enum ReelgenError {
    /// The access guard refused the request.
    #[error("access denied: {reason}")]
    AccessDenied { reason: AccessReason },

    /// The request carried no image. Checked before any network traffic.
    #[error("no image attached to the request")]
    MissingImage,

    /// A single stage exceeded its configured timeout.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Connection failure, reset stream, or a 5xx response.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Retryable failures persisted past the configured attempt cap.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<ReelgenError>,
    },

    /// The remote API refused the request with a non-retryable status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response finished without any resolvable video reference.
    #[error("no video reference found in the response")]
    NoMediaFound,

    /// Fetching the video into the local cache failed.
    #[error("download error: {message}")]
    Download {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Uploading the cached file to the relay target failed.
    #[error("relay error: {message}")]
    Relay {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The message surface rejected or timed out the video send.
    #[error("send error: {message}")]
    Send {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The originating context went away mid-request.
    #[error("request cancelled")]
    Cancelled,

    /// The requesting user already has a generation in flight.
    #[error("a generation is already running for this user")]
    Busy,

    /// Video generation is switched off in configuration.
    #[error("video generation is disabled")]
    Disabled,

    /// Missing or invalid configuration discovered at call time.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Flat classification of [`ReelgenError`], used in outcomes and logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    AccessDenied,
    MissingImage,
    Timeout,
    TransportFailure,
    Exhausted,
    ApiRejected,
    NoMediaFound,
    DownloadFailure,
    RelayFailure,
    SendFailure,
    Cancelled,
    Busy,
    Disabled,
    Config,
    Internal,
}

impl ReelgenError {
    /// Returns the flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::MissingImage => ErrorKind::MissingImage,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::Exhausted { .. } => ErrorKind::Exhausted,
            Self::Api { .. } => ErrorKind::ApiRejected,
            Self::NoMediaFound => ErrorKind::NoMediaFound,
            Self::Download { .. } => ErrorKind::DownloadFailure,
            Self::Relay { .. } => ErrorKind::RelayFailure,
            Self::Send { .. } => ErrorKind::SendFailure,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Busy => ErrorKind::Busy,
            Self::Disabled => ErrorKind::Disabled,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a retry loop may try again after this error.
    ///
    /// Timeouts, transport failures, download failures, and HTTP 429 are
    /// retryable. Everything else propagates immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } | Self::Download { .. } => true,
            Self::Api { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// Returns the innermost error when this is an [`Exhausted`](Self::Exhausted) wrapper.
    pub fn root(&self) -> &ReelgenError {
        match self {
            Self::Exhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(
            ReelgenError::Timeout {
                duration: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(
            ReelgenError::Transport {
                message: "reset".into(),
                source: None
            }
            .is_retryable()
        );
        assert!(
            ReelgenError::Api {
                status: 429,
                message: "slow down".into()
            }
            .is_retryable()
        );
        assert!(
            !ReelgenError::Api {
                status: 400,
                message: "bad".into()
            }
            .is_retryable()
        );
        assert!(!ReelgenError::NoMediaFound.is_retryable());
        assert!(!ReelgenError::MissingImage.is_retryable());
    }

    #[test]
    fn exhausted_keeps_last_cause() {
        let err = ReelgenError::Exhausted {
            attempts: 3,
            last: Box::new(ReelgenError::Timeout {
                duration: Duration::from_secs(5),
            }),
        };
        assert_eq!(err.root().kind(), ErrorKind::Timeout);
        assert!(err.to_string().contains("3 attempts"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
