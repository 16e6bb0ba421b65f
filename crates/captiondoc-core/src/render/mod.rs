//! Word and PDF serializations of a [`TranscriptDocument`].
//!
//! Both formats walk the same block list from [`build_document`], so they
//! always carry the same title, labels and text in the same order.

pub mod docx;
pub mod pdf;

use std::sync::Arc;

use crate::{
    error::{CaptionDocError, Result},
    format::{build_document, sanitize_filename},
    types::{CaptionEntry, DocumentKind, RenderedDocument, TranscriptDocument},
};

pub use docx::render_docx;
pub use pdf::render_pdf;

fn rendered(kind: DocumentKind, title: &str, bytes: Vec<u8>) -> RenderedDocument {
    RenderedDocument {
        kind,
        file_name: format!("{}.{}", sanitize_filename(title), kind.extension()),
        bytes,
    }
}

/// Render the Word and PDF transcripts. Either both documents come back or an error does.
pub fn render_documents(
    title: &str,
    entries: &[CaptionEntry],
) -> Result<(RenderedDocument, RenderedDocument)> {
    let document = build_document(title, entries);
    let docx = render_docx(&document)?;
    let pdf = render_pdf(&document)?;

    Ok((
        rendered(DocumentKind::Docx, title, docx),
        rendered(DocumentKind::Pdf, title, pdf),
    ))
}

/// Same output as [`render_documents`], with the two formats built on the blocking pool in parallel.
pub async fn render_documents_concurrently(
    title: &str,
    entries: &[CaptionEntry],
) -> Result<(RenderedDocument, RenderedDocument)> {
    let document: Arc<TranscriptDocument> = Arc::new(build_document(title, entries));

    let docx_task = tokio::task::spawn_blocking({
        let document = Arc::clone(&document);
        move || render_docx(&document)
    });
    let pdf_task = tokio::task::spawn_blocking({
        let document = Arc::clone(&document);
        move || render_pdf(&document)
    });

    let (docx, pdf) = tokio::try_join!(docx_task, pdf_task)
        .map_err(|e| CaptionDocError::render(format!("render task failed: {e}")))?;

    Ok((
        rendered(DocumentKind::Docx, title, docx?),
        rendered(DocumentKind::Pdf, title, pdf?),
    ))
}
