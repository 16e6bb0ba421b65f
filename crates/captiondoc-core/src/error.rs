use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionDocError {
    #[error("Please enter a video ID.")]
    EmptyVideoId,

    #[error("An error occurred while fetching video info: {message}")]
    MetadataLookup { message: String },

    #[error("An error occurred while fetching the transcript: {message}")]
    TranscriptLookup { message: String },

    #[error("Rendering failed: {reason}")]
    Render { reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CaptionDocError {
    pub fn metadata(message: impl ToString) -> Self {
        Self::MetadataLookup {
            message: message.to_string(),
        }
    }

    pub fn transcript(message: impl ToString) -> Self {
        Self::TranscriptLookup {
            message: message.to_string(),
        }
    }

    pub fn render(reason: impl ToString) -> Self {
        Self::Render {
            reason: reason.to_string(),
        }
    }

    /// True for failures of the remote lookups, which the caller reports
    /// together with [`crate::pipeline::failure_hints`].
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::MetadataLookup { .. } | Self::TranscriptLookup { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CaptionDocError>;
