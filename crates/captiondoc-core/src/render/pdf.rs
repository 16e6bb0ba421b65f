use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::{
    error::{CaptionDocError, Result},
    types::{RenderBlock, TranscriptDocument},
};

// US Letter, in points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const COLUMN_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 16.0;
const TITLE_LEADING: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 12.0;
const TITLE_SPACER: f32 = 12.0;
const ENTRY_SPACER: f32 = 6.0;

/// Helvetica advance widths for bytes 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
    278, 278, 584, 584, 584, 556, 1015, //
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, //
    278, 278, 278, 469, 556, 333, //
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, //
    334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, //
    333, 333, 584, 584, 584, 611, 975, //
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, //
    333, 278, 333, 584, 556, 333, //
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389,
    556, 333, 611, 556, 778, 556, 556, 500, //
    389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }

    fn glyph_width(self, byte: u8) -> f32 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let units = match byte {
            32..=126 => table[(byte - 32) as usize],
            _ => 556,
        };
        units as f32
    }

    fn text_width(self, text: &[u8], size: f32) -> f32 {
        text.iter().map(|b| self.glyph_width(*b)).sum::<f32>() * size / 1000.0
    }
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
}

#[derive(Debug)]
struct PlacedLine {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    text: Vec<u8>,
}

#[derive(Debug, Default)]
struct PageLayout {
    lines: Vec<PlacedLine>,
}

/// Places lines top to bottom, breaking onto a new page at the bottom margin.
struct Layouter {
    pages: Vec<PageLayout>,
    cursor: f32,
}

impl Layouter {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line(&mut self, font: Font, size: f32, leading: f32, align: Align, text: Vec<u8>) {
        if self.cursor - leading < MARGIN {
            self.pages.push(PageLayout::default());
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
        self.cursor -= leading;

        let x = match align {
            Align::Left => MARGIN,
            Align::Center => MARGIN + ((COLUMN_WIDTH - font.text_width(&text, size)) / 2.0).max(0.0),
        };

        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                font,
                size,
                x,
                y: self.cursor,
                text,
            });
        }
    }

    fn paragraph(
        &mut self,
        font: Font,
        size: f32,
        leading: f32,
        align: Align,
        text: &str,
    ) -> Result<()> {
        for raw_line in text.split('\n') {
            let encoded = encode_win_ansi(raw_line)?;
            for line in wrap_line(&encoded, font, size, COLUMN_WIDTH) {
                self.line(font, size, leading, align, line);
            }
        }
        Ok(())
    }

    fn space(&mut self, amount: f32) {
        self.cursor -= amount;
    }
}

fn layout(document: &TranscriptDocument) -> Result<Vec<PageLayout>> {
    let mut layouter = Layouter::new();

    for block in &document.blocks {
        match block {
            RenderBlock::Title(title) => {
                layouter.paragraph(Font::Bold, TITLE_SIZE, TITLE_LEADING, Align::Center, title)?
            }
            RenderBlock::Separator => layouter.space(TITLE_SPACER),
            RenderBlock::Entry { label, text } => {
                layouter.paragraph(Font::Bold, BODY_SIZE, BODY_LEADING, Align::Left, label)?;
                layouter.paragraph(Font::Regular, BODY_SIZE, BODY_LEADING, Align::Left, text)?;
                layouter.space(ENTRY_SPACER);
            }
        }
    }

    Ok(layouter.pages)
}

/// Fails with `Render` when the text holds characters the standard fonts cannot show.
pub fn render_pdf(document: &TranscriptDocument) -> Result<Vec<u8>> {
    let pages = layout(document)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let info_id = Ref::new(5);
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|i| (Ref::new(6 + 2 * i), Ref::new(7 + 2 * i)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (page_layout, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources()
            .fonts()
            .pair(Font::Regular.resource_name(), regular_id)
            .pair(Font::Bold.resource_name(), bold_id);
        page.finish();

        let mut content = Content::new();
        for line in &page_layout.lines {
            content
                .begin_text()
                .set_font(line.font.resource_name(), line.size)
                .next_line(line.x, line.y)
                .show(Str(&line.text))
                .end_text();
        }
        pdf.stream(*content_id, &content.finish());
    }

    pdf.document_info(info_id)
        .title(TextStr(&document.title))
        .producer(TextStr("captiondoc"));

    Ok(pdf.finish())
}

/// Maps text onto the WinAnsi code page used by the standard fonts.
fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    let mut encoded = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match c {
            '\t' => b' ',
            c if c.is_control() => continue,
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            other => {
                return Err(CaptionDocError::render(format!(
                    "the PDF fonts cannot show {other:?} (U+{:04X})",
                    other as u32
                )));
            }
        };
        encoded.push(byte);
    }
    Ok(encoded)
}

/// Greedy word wrap; words wider than the column are split between glyphs.
fn wrap_line(text: &[u8], font: Font, size: f32, max_width: f32) -> Vec<Vec<u8>> {
    let space = font.text_width(b" ", size);
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0.0;

    for word in text.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let word_width = font.text_width(word, size);

        if !current.is_empty() {
            if current_width + space + word_width <= max_width {
                current.push(b' ');
                current.extend_from_slice(word);
                current_width += space + word_width;
                continue;
            }
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if word_width <= max_width {
            current.extend_from_slice(word);
            current_width = word_width;
            continue;
        }

        for &byte in word {
            let glyph = font.glyph_width(byte) * size / 1000.0;
            if !current.is_empty() && current_width + glyph > max_width {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            current.push(byte);
            current_width += glyph;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
