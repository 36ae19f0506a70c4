// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental video URL extraction from completion responses.
//!
//! [`ResponseExtractor`] is fed raw body fragments in arrival order. It
//! decides from the first bytes whether the body is an SSE stream (`data:`,
//! `event:`, `id:`, `retry:` or `:` comment lines) or one buffered JSON
//! document, and keeps every partial line or token across fragment
//! boundaries. The accumulated state is matched against [`STRATEGIES`] in
//! order after every complete SSE line, or once a buffered document is
//! complete. Where the transport splits the body never changes the result.
//! The first hit wins and later input is ignored.

use std::sync::LazyLock;

use regex::Regex;
use reelgen_core::{ExtractedMedia, SourceForm};
use serde_json::Value;
use tracing::{debug, trace};

/// File extensions treated as video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv"];

/// Path segments that mark a URL as a video resource even without extension.
const VIDEO_PATH_SEGMENTS: &[&str] = &["video", "videos", "generated-video", "generated_video"];

/// Line prefixes that identify an SSE body.
const SSE_MARKERS: &[&str] = &["data:", "event:", "id:", "retry:", ":"];

/// Longest SSE marker; once this many non-blank bytes arrived the mode is known.
const MARKER_PROBE_LEN: usize = 6;

/// Array fields on a message or delta that may carry media attachments.
const ATTACHMENT_FIELDS: &[&str] = &["attachments", "media", "files"];

static HTML_VIDEO_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<(?:video|source)\b[^>]*?\bsrc\s*=\s*["']([^"'<>]+)["']"#).unwrap()
});

static MARKDOWN_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!?\[[^\]]*\]\(\s*<?([^()\s<>]+)>?(?:\s+"[^"]*")?\s*\)"#).unwrap()
});

static MARKDOWN_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\[[^\]]+\]:\s*<?(https?://[^\s<>]+?)>?\s*$").unwrap());

static PLAIN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"'(){}\[\]]+"#).unwrap());

/// One extraction strategy, tried in the order of [`STRATEGIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A URL found under a known key path of a parsed JSON payload.
    Structured,
    /// `<video src>` or `<source src>` in the text content.
    HtmlTag,
    /// Markdown inline or reference link to a video.
    MarkdownLink,
    /// Bare absolute URL that looks like a video.
    PlainUrl,
}

/// Extraction priority. The first strategy that yields a URL wins.
pub const STRATEGIES: [Strategy; 4] = [
    Strategy::Structured,
    Strategy::HtmlTag,
    Strategy::MarkdownLink,
    Strategy::PlainUrl,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameMode {
    Undetermined,
    Stream,
    Buffered,
}

/// Stateful extractor for one response body.
#[derive(Debug)]
pub struct ResponseExtractor {
    mode: FrameMode,
    /// Undecoded tail of a UTF-8 sequence split across fragments.
    pending_bytes: Vec<u8>,
    /// Raw text while the mode is undetermined, or the whole body in buffered mode.
    raw: String,
    /// Incomplete trailing line in stream mode.
    line_buf: String,
    /// Concatenated text content from all payloads.
    content: String,
    /// First URL found under a known JSON key path, with its form.
    structured: Option<(String, SourceForm)>,
    document_parsed: bool,
    stream_done: bool,
    found: Option<ExtractedMedia>,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self {
            mode: FrameMode::Undetermined,
            pending_bytes: Vec::new(),
            raw: String::new(),
            line_buf: String::new(),
            content: String::new(),
            structured: None,
            document_parsed: false,
            stream_done: false,
            found: None,
        }
    }

    /// Feeds the next body fragment. Returns the media once it is resolvable.
    pub fn feed(&mut self, fragment: &[u8]) -> Option<ExtractedMedia> {
        if self.found.is_some() {
            return self.found.clone();
        }

        let text = self.decode(fragment, false);
        self.ingest(&text);
        if self.mode == FrameMode::Buffered && self.document_parsed {
            // A parsed document is the whole body.
            return self.evaluate(true);
        }
        self.found.clone()
    }

    /// Flushes buffered partial content at end of body and makes a final attempt.
    pub fn finalize(&mut self) -> Option<ExtractedMedia> {
        if self.found.is_some() {
            return self.found.clone();
        }

        let tail = self.decode(&[], true);
        self.ingest(&tail);

        if self.mode == FrameMode::Undetermined {
            self.mode = if starts_with_marker(&self.raw) {
                FrameMode::Stream
            } else {
                FrameMode::Buffered
            };
            if self.mode == FrameMode::Stream {
                self.line_buf = std::mem::take(&mut self.raw);
                self.drain_lines();
            }
        }

        match self.mode {
            FrameMode::Stream => {
                if self.found.is_none() {
                    let line = std::mem::take(&mut self.line_buf);
                    self.handle_line(&line);
                }
            }
            FrameMode::Buffered => {
                if !self.document_parsed {
                    match serde_json::from_str::<Value>(self.raw.trim()) {
                        Ok(doc) => self.absorb_payload(&doc, SourceForm::JsonField),
                        Err(_) => {
                            let raw = std::mem::take(&mut self.raw);
                            self.content.push_str(&raw);
                        }
                    }
                    self.document_parsed = true;
                }
            }
            FrameMode::Undetermined => {}
        }

        let found = self.evaluate(true);
        if found.is_none() {
            debug!(
                content_len = self.content.len(),
                preview = %preview(&self.content),
                "no video reference in response"
            );
        }
        found
    }

    /// True once an SSE stream sent its `[DONE]` sentinel.
    pub fn is_complete(&self) -> bool {
        self.stream_done
    }

    /// Text content accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    fn decode(&mut self, fragment: &[u8], flush: bool) -> String {
        self.pending_bytes.extend_from_slice(fragment);
        match std::str::from_utf8(&self.pending_bytes) {
            Ok(s) => {
                let out = s.to_owned();
                self.pending_bytes.clear();
                out
            }
            Err(e) if e.error_len().is_none() && !flush => {
                // Incomplete multi-byte sequence at the end; keep it for the next fragment.
                let valid = e.valid_up_to();
                let out = String::from_utf8_lossy(&self.pending_bytes[..valid]).into_owned();
                self.pending_bytes.drain(..valid);
                out
            }
            Err(_) => {
                let out = String::from_utf8_lossy(&self.pending_bytes).into_owned();
                self.pending_bytes.clear();
                out
            }
        }
    }

    fn ingest(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.mode {
            FrameMode::Undetermined => {
                self.raw.push_str(text);
                self.detect_mode();
            }
            FrameMode::Stream => {
                self.line_buf.push_str(text);
                self.drain_lines();
            }
            FrameMode::Buffered => {
                self.raw.push_str(text);
                self.try_parse_document();
            }
        }
    }

    fn detect_mode(&mut self) {
        let probe = self.raw.trim_start();
        if probe.is_empty() {
            return;
        }

        if starts_with_marker(probe) {
            trace!("stream markers detected, reading as SSE");
            self.mode = FrameMode::Stream;
            self.line_buf = std::mem::take(&mut self.raw);
            self.drain_lines();
            return;
        }

        let could_still_be_marker = SSE_MARKERS.iter().any(|m| m.starts_with(probe));
        if could_still_be_marker && probe.len() < MARKER_PROBE_LEN && !probe.contains('\n') {
            return;
        }

        trace!("no stream markers, buffering full body");
        self.mode = FrameMode::Buffered;
        self.try_parse_document();
    }

    /// Handles every complete line, matching after each `data:` payload.
    fn drain_lines(&mut self) {
        while self.found.is_none() {
            let Some(pos) = self.line_buf.find('\n') else {
                break;
            };
            let line: String = self.line_buf.drain(..=pos).collect();
            if self.handle_line(&line) {
                self.evaluate(false);
            }
        }
    }

    /// Returns true when the line carried a payload.
    fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') || self.stream_done {
            return false;
        }

        let Some(payload) = line.strip_prefix("data:") else {
            // event:, id:, retry: and anything else carry no content.
            return false;
        };
        let payload = payload.trim();

        if payload == "[DONE]" {
            self.stream_done = true;
            return false;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(chunk) => self.absorb_payload(&chunk, SourceForm::SseData),
            Err(_) => self.content.push_str(payload),
        }
        true
    }

    fn try_parse_document(&mut self) {
        if self.document_parsed || !self.raw.trim_end().ends_with('}') {
            return;
        }
        if let Ok(doc) = serde_json::from_str::<Value>(self.raw.trim()) {
            self.absorb_payload(&doc, SourceForm::JsonField);
            self.document_parsed = true;
        }
    }

    fn absorb_payload(&mut self, payload: &Value, form: SourceForm) {
        if self.structured.is_none()
            && let Some(url) = structured_url(payload)
        {
            debug!(form = %form, "video URL found under a known key path");
            self.structured = Some((url, form));
        }

        if let Some(choice) = payload.get("choices").and_then(|c| c.get(0)) {
            for key in ["delta", "message"] {
                if let Some(content) = choice.get(key).and_then(|m| m.get("content")) {
                    append_content(&mut self.content, content);
                }
            }
        }
    }

    fn evaluate(&mut self, is_final: bool) -> Option<ExtractedMedia> {
        if self.found.is_some() {
            return self.found.clone();
        }

        let hit = STRATEGIES
            .iter()
            .find_map(|strategy| self.apply(*strategy, is_final));

        if let Some(media) = &hit {
            debug!(
                url = %media.video_url,
                form = %media.source_form,
                "video URL extracted"
            );
        }
        self.found = hit;
        self.found.clone()
    }

    fn apply(&self, strategy: Strategy, is_final: bool) -> Option<ExtractedMedia> {
        let (video_url, source_form) = match strategy {
            Strategy::Structured => self.structured.clone()?,
            Strategy::HtmlTag => (find_html_src(&self.content)?, SourceForm::HtmlTag),
            Strategy::MarkdownLink => (find_markdown_link(&self.content)?, SourceForm::MarkdownLink),
            Strategy::PlainUrl => (find_plain_url(&self.content, is_final)?, SourceForm::PlainUrl),
        };
        Some(ExtractedMedia {
            video_url,
            source_form,
        })
    }
}

fn starts_with_marker(text: &str) -> bool {
    let probe = text.trim_start();
    SSE_MARKERS.iter().any(|m| probe.starts_with(m))
}

/// Appends string content, or the text parts of an array content value.
fn append_content(buf: &mut String, content: &Value) {
    match content {
        Value::String(s) => buf.push_str(s),
        Value::Array(parts) => {
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    buf.push_str(text);
                }
            }
        }
        _ => {}
    }
}

/// Looks for a video URL under the key paths completion APIs use.
fn structured_url(payload: &Value) -> Option<String> {
    let explicit = |v: &Value| {
        v.get("video_url")
            .and_then(Value::as_str)
            .filter(|u| is_absolute_http(u))
            .map(str::to_owned)
    };

    if let Some(url) = explicit(payload) {
        return Some(url);
    }

    if let Some(items) = payload.get("data").and_then(Value::as_array)
        && let Some(url) = first_video_item(items)
    {
        return Some(url);
    }

    let choice = payload.get("choices").and_then(|c| c.get(0))?;
    ["message", "delta"].iter().find_map(|key| {
        let message = choice.get(*key)?;
        explicit(message).or_else(|| {
            ATTACHMENT_FIELDS.iter().find_map(|field| {
                message
                    .get(*field)
                    .and_then(Value::as_array)
                    .and_then(|items| first_video_item(items))
            })
        })
    })
}

fn first_video_item(items: &[Value]) -> Option<String> {
    items
        .iter()
        .filter_map(|item| item.get("url").and_then(Value::as_str))
        .find(|url| is_video_url(url))
        .map(str::to_owned)
}

fn find_html_src(content: &str) -> Option<String> {
    if !content.to_ascii_lowercase().contains("src") {
        return None;
    }
    HTML_VIDEO_SRC
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|url| is_absolute_http(url))
        .map(str::to_owned)
}

fn find_markdown_link(content: &str) -> Option<String> {
    MARKDOWN_INLINE
        .captures_iter(content)
        .chain(MARKDOWN_REFERENCE.captures_iter(content))
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|url| is_video_url(url))
        .map(str::to_owned)
}

/// A URL running to the very end of the buffer may still be growing, so it
/// only counts once more text follows it or the body has ended.
fn find_plain_url(content: &str, is_final: bool) -> Option<String> {
    PLAIN_URL
        .find_iter(content)
        .filter(|m| is_final || m.end() < content.len())
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .find(|url| is_video_url(url))
        .map(str::to_owned)
}

/// Absolute http(s) URL with a host and no characters that break out of markup.
pub fn is_absolute_http(url: &str) -> bool {
    if url.len() < 10 || url.contains(['<', '>', '"', '\'', '\n', '\r', '\t', ' ']) {
        return false;
    }
    let lower = url.to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return false;
    }
    reqwest::Url::parse(url)
        .map(|u| u.host_str().is_some())
        .unwrap_or(false)
}

/// [`is_absolute_http`] plus a video extension or a video path segment.
pub fn is_video_url(url: &str) -> bool {
    if !is_absolute_http(url) {
        return false;
    }
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };

    parsed
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .any(|segment| {
            let segment = segment.to_ascii_lowercase();
            VIDEO_PATH_SEGMENTS.contains(&segment.as_str())
                || segment
                    .rsplit_once('.')
                    .is_some_and(|(_, ext)| VIDEO_EXTENSIONS.contains(&ext))
        })
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fragments: &[&str]) -> Option<ExtractedMedia> {
        let mut extractor = ResponseExtractor::new();
        for fragment in fragments {
            if let Some(media) = extractor.feed(fragment.as_bytes()) {
                return Some(media);
            }
        }
        extractor.finalize()
    }

    fn sse(content: &str) -> String {
        let chunk = serde_json::json!({"choices": [{"delta": {"content": content}}]});
        format!("data: {chunk}\n\n")
    }

    #[test]
    fn split_fragments_match_concatenation() {
        let a = "data: {\"choices\":[{\"delta\":{\"content\":\"http://x/a.";
        let b = "mp4\"}}]}";
        let whole = format!("{a}{b}");

        let split = run(&[a, b]).expect("split feed should extract");
        let joined = run(&[whole.as_str()]).expect("whole feed should extract");
        assert_eq!(split, joined);
        assert_eq!(split.video_url, "http://x/a.mp4");
        assert_eq!(split.source_form, SourceForm::PlainUrl);

        // Byte-by-byte feeding yields the same result as well.
        let mut extractor = ResponseExtractor::new();
        let mut early = None;
        for byte in whole.as_bytes() {
            early = early.or(extractor.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(early.or_else(|| extractor.finalize()), Some(joined));
    }

    /// Feeds `body` cut in two at every byte offset.
    fn assert_split_invariant(body: &str) -> Option<ExtractedMedia> {
        let joined = run(&[body]);
        for cut in 1..body.len() {
            let mut extractor = ResponseExtractor::new();
            let bytes = body.as_bytes();
            let media = extractor
                .feed(&bytes[..cut])
                .or_else(|| extractor.feed(&bytes[cut..]))
                .or_else(|| extractor.finalize());
            assert_eq!(media, joined, "cut at byte {cut}");
        }
        joined
    }

    #[test]
    fn multi_frame_stream_is_split_invariant() {
        let attachment = serde_json::json!({
            "choices": [{"delta": {"attachments": [{"url": "https://a.example.com/structured.mp4"}]}}]
        });
        let body = format!(
            "{}data: {attachment}\n\ndata: [DONE]\n\n",
            sse("here https://a.example.com/plain.mp4 enjoy")
        );
        let media = assert_split_invariant(&body).unwrap();
        // The first frame already resolves; later frames are ignored.
        assert_eq!(media.video_url, "https://a.example.com/plain.mp4");
        assert_eq!(media.source_form, SourceForm::PlainUrl);
    }

    #[test]
    fn trailing_plain_url_yields_to_later_structured_frame() {
        let attachment = serde_json::json!({
            "choices": [{"delta": {"attachments": [{"url": "https://a.example.com/structured.mp4"}]}}]
        });
        let body = format!(
            "{}data: {attachment}\n\n",
            sse("here https://a.example.com/plain.mp4")
        );
        let media = assert_split_invariant(&body).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/structured.mp4");
        assert_eq!(media.source_form, SourceForm::SseData);
    }

    #[test]
    fn buffered_document_is_split_invariant() {
        let body = serde_json::json!({
            "video_url": "https://media.example.com/out/structured.mp4",
            "choices": [{"message": {"content": "or https://other.example.com/plain.mp4"}}]
        })
        .to_string();
        let media = assert_split_invariant(&body).unwrap();
        assert_eq!(media.source_form, SourceForm::JsonField);
    }

    #[test]
    fn refeeding_is_idempotent() {
        let fragments = [
            "data: {\"choices\":[{\"delta\":{\"content\":\"<video src=\\\"https://cdn.example.com/v/1",
            ".mp4\\\"></video>\"}}]}\n\n",
            "data: [DONE]\n\n",
        ];
        assert_eq!(run(&fragments), run(&fragments));
        assert_eq!(run(&fragments).unwrap().source_form, SourceForm::HtmlTag);
    }

    #[test]
    fn json_field_beats_plain_url() {
        let body = serde_json::json!({
            "video_url": "https://media.example.com/out/structured.mp4",
            "choices": [{"message": {"content": "see https://other.example.com/plain.mp4 now"}}]
        })
        .to_string();
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.video_url, "https://media.example.com/out/structured.mp4");
        assert_eq!(media.source_form, SourceForm::JsonField);
    }

    #[test]
    fn html_beats_markdown_and_plain() {
        let content = "[clip](https://a.example.com/md.mp4) https://b.example.com/plain.mp4 \
                       <video controls src='https://c.example.com/html.mp4'></video>";
        let body = sse(content);
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.video_url, "https://c.example.com/html.mp4");
    }

    #[test]
    fn markdown_beats_plain() {
        let content = "first https://b.example.com/plain.mp4 then [clip](https://a.example.com/md.webm)";
        let body = sse(content);
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/md.webm");
        assert_eq!(media.source_form, SourceForm::MarkdownLink);
    }

    #[test]
    fn markdown_reference_links_are_found() {
        let content = "Your video is ready.\n\n[video]: https://a.example.com/ref/clip.mp4\n";
        let media = run(&[sse(content).as_str()]).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/ref/clip.mp4");
        assert_eq!(media.source_form, SourceForm::MarkdownLink);
    }

    #[test]
    fn sse_attachment_field_is_structured() {
        let chunk = serde_json::json!({
            "choices": [{"delta": {"attachments": [
                {"url": "https://a.example.com/poster.png"},
                {"url": "https://a.example.com/clip.mp4"}
            ]}}]
        });
        let body = format!("data: {chunk}\n\n");
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/clip.mp4");
        assert_eq!(media.source_form, SourceForm::SseData);
    }

    #[test]
    fn noise_lines_are_skipped() {
        let body = format!(
            ": keep-alive\n\nevent: message\nid: 7\nretry: 1000\ndata: not json at all \n{}data: [DONE]\n",
            sse("done: https://a.example.com/videos/abc123 ok")
        );
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/videos/abc123");
    }

    #[test]
    fn stream_url_is_not_cut_short_mid_stream() {
        let mut extractor = ResponseExtractor::new();
        assert!(extractor.feed(sse("https://a.example.com/clip.mp4").as_bytes()).is_none());
        let media = extractor.feed(sse("?sig=abc done").as_bytes()).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/clip.mp4?sig=abc");
    }

    #[test]
    fn first_match_is_kept_after_more_fragments() {
        let mut extractor = ResponseExtractor::new();
        let first = extractor
            .feed(sse("<video src=\"https://a.example.com/one.mp4\">").as_bytes())
            .unwrap();
        let again = extractor
            .feed(sse("<video src=\"https://a.example.com/two.mp4\">").as_bytes())
            .unwrap();
        assert_eq!(first, again);
        assert_eq!(extractor.finalize(), Some(first));
    }

    #[test]
    fn done_sentinel_marks_completion() {
        let mut extractor = ResponseExtractor::new();
        extractor.feed(b"data: {\"choices\":[]}\n\ndata: [DONE]\n\n");
        assert!(extractor.is_complete());
    }

    #[test]
    fn buffered_html_body_without_json() {
        let body = "<p>here</p><video width=\"320\" src=\"https://a.example.com/x.mov\"></video>";
        let media = run(&[&body[..20], &body[20..]]).unwrap();
        assert_eq!(media.video_url, "https://a.example.com/x.mov");
        assert_eq!(media.source_form, SourceForm::HtmlTag);
    }

    #[test]
    fn buffered_message_content_is_scanned() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Done! https://a.example.com/gen/v.mp4"}}]
        })
        .to_string();
        let media = run(&[body.as_str()]).unwrap();
        assert_eq!(media.source_form, SourceForm::PlainUrl);
        assert_eq!(media.video_url, "https://a.example.com/gen/v.mp4");
    }

    #[test]
    fn split_utf8_sequence_is_reassembled() {
        let body = sse("视频 https://a.example.com/clip.mp4 好");
        let bytes = body.as_bytes();
        // Split inside the first multi-byte character.
        let cut = body.find('视').unwrap() + 1;
        let mut extractor = ResponseExtractor::new();
        let early = extractor.feed(&bytes[..cut]);
        let media = early.or(extractor.feed(&bytes[cut..])).or(extractor.finalize());
        assert_eq!(media.unwrap().video_url, "https://a.example.com/clip.mp4");
        assert!(extractor.content().starts_with("视频"));
    }

    #[test]
    fn no_video_yields_none() {
        assert!(run(&[sse("sorry, I cannot do that https://example.com/help").as_str()]).is_none());
        assert!(run(&[""]).is_none());
    }

    #[test]
    fn url_validation() {
        assert!(is_video_url("https://a.example.com/x.mp4"));
        assert!(is_video_url("https://a.example.com/x.MP4?token=1"));
        assert!(is_video_url("https://a.example.com/videos/123"));
        assert!(!is_video_url("https://a.example.com/x.png"));
        assert!(!is_video_url("ftp://a.example.com/x.mp4"));
        assert!(!is_video_url("http://x"));
        assert!(is_absolute_http("http://x/a.mp4"));
        assert!(!is_absolute_http("https://a.example.com/\"x.mp4"));
    }
}
