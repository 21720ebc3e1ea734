//! Report layout: blocks of wrapped text placed on fixed-size pages

use crate::state_machine::{Message, Role};
use chrono::{DateTime, Local};

pub const REPORT_TITLE: &str = "Conversation Summary Report";
pub const HISTORY_HEADING: &str = "Conversation History";

const MM_PER_PT: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.3;

/// Page size and margins, in millimetres
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageGeometry {
    /// US Letter with one-inch margins
    pub fn letter() -> Self {
        Self {
            width_mm: 215.9,
            height_mm: 279.4,
            margin_mm: 25.4,
        }
    }

    fn text_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Visual role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Meta,
    Heading,
    User,
    Assistant,
}

impl LineStyle {
    pub fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 24.0,
            LineStyle::Meta => 12.0,
            LineStyle::Heading => 16.0,
            LineStyle::User | LineStyle::Assistant => 11.0,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, LineStyle::Title | LineStyle::Heading)
    }

    /// Fill colour as RGB in 0..=1
    pub fn color(self) -> (f32, f32, f32) {
        match self {
            LineStyle::User => (0.0, 0.0, 1.0),
            LineStyle::Assistant => (0.0, 0.5, 0.0),
            _ => (0.0, 0.0, 0.0),
        }
    }

    fn indent_mm(self) -> f32 {
        match self {
            LineStyle::User | LineStyle::Assistant => 7.0,
            _ => 0.0,
        }
    }

    fn space_after_mm(self) -> f32 {
        let pt = match self {
            LineStyle::Title => 30.0,
            LineStyle::Meta => 6.0,
            LineStyle::Heading => 12.0,
            LineStyle::User | LineStyle::Assistant => 14.0,
        };
        pt * MM_PER_PT
    }

    fn line_height_mm(self) -> f32 {
        self.font_size() * LINE_SPACING * MM_PER_PT
    }

    fn glyph_width_mm(self) -> f32 {
        self.font_size() * AVG_GLYPH_WIDTH * MM_PER_PT
    }
}

/// One conversation entry in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub role: Role,
    pub text: String,
}

/// Everything that goes into a report, before any positioning
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub generated_at: DateTime<Local>,
    pub total_messages: usize,
    pub user_messages: usize,
    pub entries: Vec<ReportEntry>,
}

/// A run of lines sharing one style
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub style: LineStyle,
    pub lines: Vec<String>,
}

/// A line with its final position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub style: LineStyle,
    pub text: String,
    pub x_mm: f32,
    /// Baseline, measured from the bottom of the page
    pub y_mm: f32,
}

impl ReportLayout {
    pub fn build(messages: &[Message], user_message_count: usize, generated_at: DateTime<Local>) -> Self {
        Self {
            generated_at,
            total_messages: messages.len(),
            user_messages: user_message_count,
            entries: messages
                .iter()
                .map(|m| ReportEntry {
                    role: m.role,
                    text: m.content.clone(),
                })
                .collect(),
        }
    }

    pub fn metadata_lines(&self) -> Vec<String> {
        vec![
            format!("Date: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Total Messages: {}", self.total_messages),
            format!("User Messages: {}", self.user_messages),
        ]
    }

    /// Break the report into styled, wrapped blocks
    pub fn blocks(&self, geometry: &PageGeometry) -> Vec<Block> {
        let mut blocks = vec![Block {
            style: LineStyle::Title,
            lines: vec![REPORT_TITLE.to_string()],
        }];

        blocks.extend(self.metadata_lines().into_iter().map(|line| Block {
            style: LineStyle::Meta,
            lines: vec![line],
        }));

        blocks.push(Block {
            style: LineStyle::Heading,
            lines: vec![HISTORY_HEADING.to_string()],
        });

        for entry in &self.entries {
            let style = match entry.role {
                Role::User => LineStyle::User,
                Role::Assistant => LineStyle::Assistant,
            };
            let text = format!("{}: {}", entry.role.label(), entry.text);
            blocks.push(Block {
                style,
                lines: wrap_text(&text, max_chars(style, geometry)),
            });
        }

        blocks
    }

    /// Position every line, starting a new page whenever the bottom margin
    /// is reached. Always returns at least one page.
    pub fn paginate(&self, geometry: &PageGeometry) -> Vec<Vec<PlacedLine>> {
        let top = geometry.height_mm - geometry.margin_mm;
        let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
        let mut cursor = top;

        for block in self.blocks(geometry) {
            let style = block.style;
            for text in block.lines {
                cursor -= style.line_height_mm();
                if cursor < geometry.margin_mm {
                    pages.push(Vec::new());
                    cursor = top - style.line_height_mm();
                }
                let x_mm = if style == LineStyle::Title {
                    centered_x(&text, style, geometry)
                } else {
                    geometry.margin_mm + style.indent_mm()
                };
                if let Some(page) = pages.last_mut() {
                    page.push(PlacedLine {
                        style,
                        text,
                        x_mm,
                        y_mm: cursor,
                    });
                }
            }
            cursor -= style.space_after_mm();
        }

        pages
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn max_chars(style: LineStyle, geometry: &PageGeometry) -> usize {
    let available = geometry.text_width_mm() - style.indent_mm();
    ((available / style.glyph_width_mm()).floor() as usize).max(1)
}

#[allow(clippy::cast_precision_loss)]
fn centered_x(text: &str, style: LineStyle, geometry: &PageGeometry) -> f32 {
    let width = text.chars().count() as f32 * style.glyph_width_mm();
    ((geometry.width_mm - width) / 2.0).max(geometry.margin_mm)
}

/// Greedy word wrap on character counts. Words longer than a line are
/// split; explicit newlines start a new line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                let piece_len = piece.len();
                let needed = if current_len == 0 { piece_len } else { current_len + 1 + piece_len };
                if needed > max_chars && current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(piece);
                current_len += piece_len;
            }
        }

        lines.push(current);
    }

    lines
}
