use crate::types::{CaptionEntry, RenderBlock, TranscriptDocument};

const FORBIDDEN_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Format whole seconds as M:SS. Minutes are neither padded nor capped at 59.
pub fn format_timestamp(seconds: u64) -> String {
    let (mins, secs) = (seconds / 60, seconds % 60);
    format!("{}:{:02}", mins, secs)
}

/// Strip characters that are illegal in file names and replace spaces with underscores.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Lay out the title and caption entries as the block sequence every document format renders.
pub fn build_document(title: &str, entries: &[CaptionEntry]) -> TranscriptDocument {
    let mut blocks = Vec::with_capacity(entries.len() + 2);
    blocks.push(RenderBlock::Title(title.to_string()));
    blocks.push(RenderBlock::Separator);
    blocks.extend(entries.iter().map(|entry| RenderBlock::Entry {
        label: format_timestamp(entry.start_seconds),
        text: entry.text.clone(),
    }));

    TranscriptDocument {
        title: title.to_string(),
        blocks,
    }
}

/// Plain-text rendering of a document, one line per block line.
pub fn format_transcript_plain(document: &TranscriptDocument) -> String {
    let mut output = String::new();
    for block in &document.blocks {
        match block {
            RenderBlock::Title(title) => {
                output.push_str(title);
                output.push('\n');
            }
            RenderBlock::Separator => output.push('\n'),
            RenderBlock::Entry { label, text } => {
                output.push_str(&format!("{}\n{}\n\n", label, text));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_pad_seconds_only() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(5), "0:05");
        assert_eq!(format_timestamp(65), "1:05");
        assert_eq!(format_timestamp(75), "1:15");
        assert_eq!(format_timestamp(3661), "61:01");
    }

    #[test]
    fn sanitize_strips_reserved_characters() {
        assert_eq!(sanitize_filename("My: Video?"), "My_Video");
        assert_eq!(sanitize_filename(r#"a\b/c*d?e:f"g<h>i|j"#), "abcdefghij");
        assert_eq!(sanitize_filename("Test Video"), "Test_Video");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "",
            "plain",
            "  spaced  out  ",
            "What? Why: \"quotes\" <tags> | pipes",
            "Ünïcödé / ファイル名 * テスト",
            "already_clean_name",
        ];
        for sample in samples {
            let once = sanitize_filename(sample);
            assert_eq!(sanitize_filename(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn document_keeps_entry_order() {
        let entries = vec![
            CaptionEntry::new(75, "World"),
            CaptionEntry::new(0, "Hello"),
            CaptionEntry::new(75, "World"),
        ];
        let doc = build_document("T", &entries);

        assert_eq!(
            doc.blocks,
            vec![
                RenderBlock::Title("T".into()),
                RenderBlock::Separator,
                RenderBlock::Entry {
                    label: "1:15".into(),
                    text: "World".into()
                },
                RenderBlock::Entry {
                    label: "0:00".into(),
                    text: "Hello".into()
                },
                RenderBlock::Entry {
                    label: "1:15".into(),
                    text: "World".into()
                },
            ]
        );
    }

    #[test]
    fn plain_text_lists_labels_then_text() {
        let doc = build_document("Test Video", &[CaptionEntry::new(0, "Hello")]);
        assert_eq!(format_transcript_plain(&doc), "Test Video\n\n0:00\nHello\n\n");
    }
}
