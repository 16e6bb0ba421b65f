use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};

use crate::{
    error::{CaptionDocError, Result},
    types::{RenderBlock, TranscriptDocument},
};

/// Half-points, so 16pt.
const TITLE_SIZE: usize = 32;

pub fn render_docx(document: &TranscriptDocument) -> Result<Vec<u8>> {
    let mut docx = Docx::new();

    for block in &document.blocks {
        let paragraph = match block {
            RenderBlock::Title(title) => Paragraph::new()
                .add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
            RenderBlock::Separator => Paragraph::new(),
            RenderBlock::Entry { label, text } => Paragraph::new()
                .add_run(Run::new().add_text(label).bold())
                .add_run(text_run(text))
                .align(AlignmentType::Left),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| CaptionDocError::render(format!("docx packaging failed: {e}")))?;

    Ok(buf.into_inner())
}

/// Caption text on its own line under the label, followed by a trailing break.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for line in text.split('\n') {
        run = run.add_break(BreakType::TextWrapping).add_text(line);
    }
    run.add_break(BreakType::TextWrapping)
}
