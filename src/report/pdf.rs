//! PDF encoding of a laid-out report

use super::layout::{PageGeometry, ReportLayout, REPORT_TITLE};
use super::{RenderError, ReportRenderer};
use crate::state_machine::Message;
use chrono::{DateTime, Local};
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};

/// Renders transcripts with the PDF base-14 Helvetica fonts
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    geometry: PageGeometry,
}

impl PdfRenderer {
    /// Render with an explicit timestamp
    pub fn render_at(
        &self,
        messages: &[Message],
        user_message_count: usize,
        generated_at: DateTime<Local>,
    ) -> Result<Vec<u8>, RenderError> {
        let layout = ReportLayout::build(messages, user_message_count, generated_at);
        let pages = layout.paginate(&self.geometry);
        let width = Mm(self.geometry.width_mm);
        let height = Mm(self.geometry.height_mm);

        let (doc, first_page, first_layer) = PdfDocument::new(REPORT_TITLE, width, height, "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, format!("Page {} Layer 1", index + 1))
            };
            let canvas = doc.get_page(page).get_layer(layer);

            for line in lines {
                let (r, g, b) = line.style.color();
                canvas.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
                let font = if line.style.is_bold() { &bold } else { &regular };
                canvas.use_text(
                    to_win_ansi(&line.text),
                    line.style.font_size(),
                    Mm(line.x_mm),
                    Mm(line.y_mm),
                    font,
                );
            }
        }

        tracing::debug!(
            pages = pages.len(),
            messages = messages.len(),
            "Rendered transcript report"
        );

        doc.save_to_bytes().map_err(pdf_error)
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(
        &self,
        messages: &[Message],
        user_message_count: usize,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_at(messages, user_message_count, Local::now())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn pdf_error(e: printpdf::Error) -> RenderError {
    RenderError::Pdf(format!("{e:?}"))
}

/// Characters outside ASCII and Latin-1 that WinAnsiEncoding still maps
/// (its 0x80..=0x9F block)
const WIN_ANSI_EXTRAS: &[char] = &[
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// The base-14 fonts are WinAnsi encoded. Anything the encoding cannot
/// represent (emoji, CJK, control characters) is dropped.
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            ' '..='~' | '\u{A0}'..='\u{FF}' => Some(c),
            c if WIN_ANSI_EXTRAS.contains(&c) => Some(c),
            _ => None,
        })
        .collect()
}
