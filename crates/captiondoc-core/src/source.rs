use crate::{
    error::Result,
    types::{CaptionEntry, VideoId, VideoMetadata},
};

/// Looks up the display title and thumbnail of a video.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    async fn resolve_metadata(&self, video_id: &VideoId) -> Result<VideoMetadata>;
}

/// Fetches the default caption track of a video, in the order the service returns it.
#[allow(async_fn_in_trait)]
pub trait TranscriptSource {
    async fn resolve_transcript(&self, video_id: &VideoId) -> Result<Vec<CaptionEntry>>;
}
