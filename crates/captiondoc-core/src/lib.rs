//! Captiondoc Core Library
//!
//! Fetches a YouTube video's title and default caption track and renders the
//! captions as timestamped Word and PDF transcripts.

pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use config::HostingConfig;
pub use error::{CaptionDocError, Result};
pub use format::{build_document, format_timestamp, format_transcript_plain, sanitize_filename};
pub use pipeline::{failure_hints, generate_documents, save_documents};
pub use render::{render_documents, render_documents_concurrently};
pub use source::{MetadataSource, TranscriptSource};
pub use types::{
    CaptionEntry, DocumentKind, RenderBlock, RenderedDocument, TranscriptBundle,
    TranscriptDocument, VideoId, VideoMetadata,
};
pub use youtube::{YoutubeClient, parse_video_id};
