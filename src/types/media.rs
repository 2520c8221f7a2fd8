//! Media payloads for posts, stories and profile images.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media attached to a post or story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

impl MediaType {
    /// Classify a MIME content type. Anything not `video/*` is an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// A file selected by the user, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Create an upload payload.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Media type derived from the content type.
    pub fn media_type(&self) -> MediaType {
        MediaType::from_content_type(&self.content_type)
    }

    /// True when there is nothing to upload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File name with path separators replaced, safe to embed in a storage path.
    pub fn sanitized_file_name(&self) -> String {
        let cleaned: String = self
            .file_name
            .chars()
            .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
            .collect();
        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned
        }
    }
}
