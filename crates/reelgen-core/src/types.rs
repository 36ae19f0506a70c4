// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by every pipeline stage.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ErrorKind;

/// Chat conversation identifier; the unit of access control and rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

/// Identifier of the user who issued the command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One image-to-video request, owned by a single pipeline invocation.
///
/// `group_id` is `None` for direct messages, which skip group control and
/// rate limiting.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub group_id: Option<GroupId>,
    pub user_id: UserId,
    pub prompt: String,
    pub image: Option<Vec<u8>>,
    pub submitted_at: DateTime<Utc>,
}

impl GenerationRequest {
    /// Creates a request stamped with the current time.
    pub fn new(
        group_id: Option<GroupId>,
        user_id: UserId,
        prompt: impl Into<String>,
        image: Option<Vec<u8>>,
    ) -> Self {
        Self {
            group_id,
            user_id,
            prompt: prompt.into(),
            image,
            submitted_at: Utc::now(),
        }
    }

    /// Returns the image bytes if a non-empty image is attached.
    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image.as_deref().filter(|b| !b.is_empty())
    }
}

/// Why the access guard decided the way it did.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessReason {
    Ok,
    GroupDenied,
    RateLimited,
}

/// Result of an access check. Derived per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: AccessReason::Ok,
        }
    }

    pub fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Where in the response the video URL was found.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceForm {
    /// A known key path in a buffered JSON document.
    JsonField,
    /// A known key path inside a streamed `data:` frame.
    SseData,
    /// `src` attribute of an HTML `<video>` or `<source>` tag.
    HtmlTag,
    /// Target of a Markdown link.
    MarkdownLink,
    /// Bare absolute URL in the text.
    PlainUrl,
}

/// A video URL recovered from an API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMedia {
    pub video_url: String,
    pub source_form: SourceForm,
}

/// How the video reached the message surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Transport {
    RemoteUrl,
    LocalFile,
    RelayedFile,
}

/// What the message surface is asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoReference {
    /// The original remote URL, sent as-is.
    RemoteUrl(String),
    /// A file in the local cache directory.
    LocalFile(PathBuf),
    /// A path returned by the relay target, readable by the surface.
    RelayPath(String),
}

impl VideoReference {
    pub fn transport(&self) -> Transport {
        match self {
            Self::RemoteUrl(_) => Transport::RemoteUrl,
            Self::LocalFile(_) => Transport::LocalFile,
            Self::RelayPath(_) => Transport::RelayedFile,
        }
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteUrl(url) => f.write_str(url),
            Self::LocalFile(path) => write!(f, "{}", path.display()),
            Self::RelayPath(path) => f.write_str(path),
        }
    }
}

/// Result of a delivery attempt. Always names the transport that was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub succeeded: bool,
    pub transport: Transport,
    pub error_kind: Option<ErrorKind>,
}

impl DeliveryOutcome {
    pub fn success(transport: Transport) -> Self {
        Self {
            succeeded: true,
            transport,
            error_kind: None,
        }
    }

    pub fn failure(transport: Transport, kind: ErrorKind) -> Self {
        Self {
            succeeded: false,
            transport,
            error_kind: Some(kind),
        }
    }
}
