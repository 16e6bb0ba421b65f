use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    error::Result,
    render::render_documents_concurrently,
    source::{MetadataSource, TranscriptSource},
    types::{TranscriptBundle, VideoId},
};

/// Likely causes shown to the user after a failed lookup.
pub fn failure_hints() -> [&'static str; 4] {
    [
        "The video doesn't have any captions or transcripts.",
        "The captions are disabled for this video.",
        "The video ID is incorrect or the video doesn't exist.",
        "There might be temporary issues with YouTube's transcript API.",
    ]
}

/// Resolve metadata, then the transcript, then render both documents.
///
/// Stops at the first failure: the transcript is never requested when the
/// metadata lookup fails, and nothing is rendered when either lookup fails.
pub async fn generate_documents<M, T>(
    video_id: &VideoId,
    metadata_source: &M,
    transcript_source: &T,
) -> Result<TranscriptBundle>
where
    M: MetadataSource,
    T: TranscriptSource,
{
    let metadata = metadata_source.resolve_metadata(video_id).await?;
    tracing::debug!(%video_id, title = %metadata.title, "resolved metadata");

    let entries = transcript_source.resolve_transcript(video_id).await?;
    tracing::debug!(%video_id, entries = entries.len(), "resolved transcript");

    let (docx, pdf) = render_documents_concurrently(&metadata.title, &entries).await?;
    tracing::debug!(docx_bytes = docx.bytes.len(), pdf_bytes = pdf.bytes.len(), "rendered documents");

    Ok(TranscriptBundle {
        metadata,
        entries,
        docx,
        pdf,
    })
}

/// Write both documents into `out_dir` under their suggested file names.
///
/// Either both files end up on disk or neither does.
pub async fn save_documents(bundle: &TranscriptBundle, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).await?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(2);
    for document in bundle.documents() {
        let path = out_dir.join(&document.file_name);
        if let Err(e) = fs::write(&path, &document.bytes).await {
            for done in &written {
                if let Err(cleanup) = fs::remove_file(done).await {
                    tracing::warn!(path = %done.display(), error = %cleanup, "could not remove partial output");
                }
            }
            return Err(e.into());
        }
        written.push(path);
    }

    Ok(written)
}
