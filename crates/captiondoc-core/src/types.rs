use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CaptionDocError, Result};

/// Opaque video identifier as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CaptionDocError::EmptyVideoId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub start_seconds: u64,
    pub text: String,
}

impl CaptionEntry {
    pub fn new(start_seconds: u64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            text: text.into(),
        }
    }

    /// Builds an entry from the fractional offset reported upstream.
    /// The fraction is dropped; negative or non-finite offsets become zero.
    pub fn from_offset(start: f64, text: impl Into<String>) -> Self {
        let start_seconds = if start.is_finite() && start > 0.0 {
            start.trunc() as u64
        } else {
            0
        };
        Self::new(start_seconds, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBlock {
    Title(String),
    Separator,
    Entry { label: String, text: String },
}

/// Format-independent layout shared by every serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDocument {
    pub title: String,
    pub blocks: Vec<RenderBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Docx,
    Pdf,
}

impl DocumentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Docx => "docx",
            DocumentKind::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Pdf => "application/pdf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Docx => "Word",
            DocumentKind::Pdf => "PDF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub kind: DocumentKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Everything produced for one video. Both documents are always present.
#[derive(Debug, Clone)]
pub struct TranscriptBundle {
    pub metadata: VideoMetadata,
    pub entries: Vec<CaptionEntry>,
    pub docx: RenderedDocument,
    pub pdf: RenderedDocument,
}

impl TranscriptBundle {
    pub fn documents(&self) -> [&RenderedDocument; 2] {
        [&self.docx, &self.pdf]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_rejects_blank_input() {
        assert!(matches!(
            VideoId::new("   "),
            Err(CaptionDocError::EmptyVideoId)
        ));
        assert_eq!(VideoId::new(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn offsets_are_truncated_not_rounded() {
        assert_eq!(CaptionEntry::from_offset(75.99, "x").start_seconds, 75);
        assert_eq!(CaptionEntry::from_offset(0.4, "x").start_seconds, 0);
        assert_eq!(CaptionEntry::from_offset(-3.0, "x").start_seconds, 0);
        assert_eq!(CaptionEntry::from_offset(f64::NAN, "x").start_seconds, 0);
    }

    #[test]
    fn mime_types_match_formats() {
        assert_eq!(DocumentKind::Pdf.mime_type(), "application/pdf");
        assert_eq!(
            DocumentKind::Docx.mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }
}
