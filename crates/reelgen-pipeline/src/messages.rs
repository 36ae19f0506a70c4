// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.
//!
//! Raw error text never reaches the end user; every error kind maps to a
//! short fixed message here.

use reelgen_core::{AccessReason, ErrorKind, ReelgenError};

/// Acknowledgement sent once a request passes the access checks.
pub const ACCEPTED: &str = "Request received, generating a video from your image. This can take a few minutes.";

/// Reply for users outside `access.admin_users`.
pub const ADMIN_ONLY: &str = "This command is restricted to administrators.";

/// Maps an error to the reply shown to the requester.
pub fn user_message(error: &ReelgenError) -> String {
    match error {
        ReelgenError::AccessDenied { reason } => match reason {
            AccessReason::RateLimited => {
                "This group has reached its video generation limit. Please try again later.".into()
            }
            _ => "Video generation is not available in this group.".into(),
        },
        ReelgenError::MissingImage => {
            "Please attach an image, or reply to one, to turn it into a video.".into()
        }
        ReelgenError::Timeout { .. } => "The video service did not respond in time.".into(),
        ReelgenError::Exhausted { attempts, last } => exhausted_message(*attempts, last.root()),
        ReelgenError::Transport { .. } => "The video service could not be reached.".into(),
        ReelgenError::Api { status, .. } => match status {
            403 => "The video service rejected the API credential. Ask an administrator to check the key.".into(),
            429 => "The video service is busy right now. Please try again later.".into(),
            _ => format!("The video service rejected the request (HTTP {status})."),
        },
        ReelgenError::NoMediaFound => "The video service finished without returning a video.".into(),
        ReelgenError::Download { .. } => "Downloading the generated video failed.".into(),
        ReelgenError::Relay { .. } => "Passing the video to the file relay failed.".into(),
        ReelgenError::Send { .. } => {
            "Sending the video failed or timed out. If it still shows up, it went through.".into()
        }
        ReelgenError::Cancelled => "The request was cancelled.".into(),
        ReelgenError::Busy => {
            "You already have a video generation in progress. Please wait for it to finish.".into()
        }
        ReelgenError::Disabled => "Video generation is currently disabled.".into(),
        ReelgenError::Config(_) => {
            "Video generation is not configured correctly. Ask an administrator to check the settings.".into()
        }
        ReelgenError::Internal(_) => "Something went wrong while generating the video.".into(),
    }
}

fn exhausted_message(attempts: u32, root: &ReelgenError) -> String {
    match root.kind() {
        ErrorKind::Timeout => {
            format!("The video service timed out after {attempts} attempts. Please try again later.")
        }
        ErrorKind::DownloadFailure => {
            format!("Downloading the generated video failed after {attempts} attempts.")
        }
        ErrorKind::ApiRejected => {
            format!("The video service kept refusing the request after {attempts} attempts. Please try again later.")
        }
        _ => format!("The video service failed after {attempts} attempts. Please try again later."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn exhausted_timeouts_name_the_attempt_count() {
        let err = ReelgenError::Exhausted {
            attempts: 3,
            last: Box::new(ReelgenError::Timeout {
                duration: Duration::from_secs(180),
            }),
        };
        assert_eq!(
            user_message(&err),
            "The video service timed out after 3 attempts. Please try again later."
        );
    }

    #[test]
    fn access_reasons_have_distinct_texts() {
        let denied = user_message(&ReelgenError::AccessDenied {
            reason: AccessReason::GroupDenied,
        });
        let limited = user_message(&ReelgenError::AccessDenied {
            reason: AccessReason::RateLimited,
        });
        assert_ne!(denied, limited);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let cases = [
            ReelgenError::Transport {
                message: "connect ECONNREFUSED 10.0.0.7:443".into(),
                source: None,
            },
            ReelgenError::Api {
                status: 400,
                message: "secret-internal-detail".into(),
            },
            ReelgenError::Internal("stack trace".into()),
            ReelgenError::Config("api.api_key is not set".into()),
        ];
        for err in &cases {
            let text = user_message(err);
            assert!(!text.contains("10.0.0.7"));
            assert!(!text.contains("secret-internal-detail"));
            assert!(!text.contains("stack trace"));
            assert!(!text.contains("api_key"));
        }
    }
}
