//! Report layout. Turns a `ReportDocument` into positioned lines on A4 pages.
//!
//! Pure computation; the renderer only draws what this module places.
//! Coordinates are millimetres from the bottom-left corner (PDF convention).

use crate::layout::font_metrics::{get_metrics, ReportFont};
use crate::layout::wrap::wrap_line;
use crate::report::document::{paragraphs, ReportDocument, REFERENCES_HEADING};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Layout parameters for a report page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_size_pt: f32,
    pub title_leading_pt: f32,
    pub heading_size_pt: f32,
    pub heading_leading_pt: f32,
    pub body_size_pt: f32,
    pub body_leading_pt: f32,
    /// RGB in 0.0..=1.0.
    pub heading_color: (f32, f32, f32),
}

/// A4, 2 cm margins, 18/13/11 pt type, headings in #003366.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_mm: 20.0,
        title_size_pt: 18.0,
        title_leading_pt: 22.0,
        heading_size_pt: 13.0,
        heading_leading_pt: 16.0,
        body_size_pt: 11.0,
        body_leading_pt: 16.0,
        heading_color: (0.0, 0x33 as f32 / 255.0, 0x66 as f32 / 255.0),
    }
}

impl PageConfig {
    pub fn text_width_pt(&self) -> f32 {
        (self.page_width_mm - 2.0 * self.margin_mm) / MM_PER_PT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    Heading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font: ReportFont,
    pub size_pt: f32,
    pub x_mm: f32,
    /// Baseline position.
    pub y_mm: f32,
    pub color: TextColor,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

struct Style {
    font: ReportFont,
    size_pt: f32,
    leading_pt: f32,
    color: TextColor,
}

struct Cursor<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    /// Top of the next line box.
    y_mm: f32,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            y_mm: config.page_height_mm - config.margin_mm,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y_mm = self.config.page_height_mm - self.config.margin_mm;
    }

    fn current_page_is_empty(&self) -> bool {
        self.pages.last().map_or(true, |p| p.lines.is_empty())
    }

    /// Breaks the page unless `height_pt` still fits above the bottom margin.
    fn ensure(&mut self, height_pt: f32) {
        if self.y_mm - height_pt * MM_PER_PT < self.config.margin_mm && !self.current_page_is_empty() {
            self.new_page();
        }
    }

    fn space(&mut self, pt: f32) {
        self.y_mm -= pt * MM_PER_PT;
    }

    fn place(&mut self, text: String, style: &Style) {
        self.ensure(style.leading_pt);
        let leading_mm = style.leading_pt * MM_PER_PT;
        let baseline = self.y_mm - leading_mm * 0.8;
        self.y_mm -= leading_mm;
        let line = PlacedLine {
            text,
            font: style.font,
            size_pt: style.size_pt,
            x_mm: self.config.margin_mm,
            y_mm: baseline,
            color: style.color,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }

    fn place_wrapped(&mut self, text: &str, style: &Style) {
        let metrics = get_metrics(style.font);
        let width = self.config.text_width_pt();
        for line in wrap_line(text, metrics, style.size_pt, width) {
            self.place(line, style);
        }
    }
}

/// Lays out the whole report. Always returns at least one page.
pub fn layout_report(doc: &ReportDocument, config: &PageConfig) -> Vec<Page> {
    let title = Style {
        font: ReportFont::HelveticaBold,
        size_pt: config.title_size_pt,
        leading_pt: config.title_leading_pt,
        color: TextColor::Black,
    };
    let heading = Style {
        font: ReportFont::HelveticaBold,
        size_pt: config.heading_size_pt,
        leading_pt: config.heading_leading_pt,
        color: TextColor::Heading,
    };
    let body = Style {
        font: ReportFont::Helvetica,
        size_pt: config.body_size_pt,
        leading_pt: config.body_leading_pt,
        color: TextColor::Black,
    };

    let mut cursor = Cursor::new(config);

    cursor.place_wrapped(&doc.title, &title);
    cursor.space(12.0);
    cursor.place_wrapped(&doc.byline, &body);
    cursor.space(12.0);

    for section in &doc.sections {
        // keep the heading with at least one body line
        cursor.ensure(heading.leading_pt + 8.0 + body.leading_pt);
        cursor.place_wrapped(&section.heading, &heading);
        cursor.space(8.0);
        for paragraph in paragraphs(&section.body) {
            for line in paragraph {
                cursor.place_wrapped(line, &body);
            }
            cursor.space(6.0);
        }
        cursor.space(8.0);
    }

    if !doc.references.is_empty() {
        if !cursor.current_page_is_empty() {
            cursor.new_page();
        }
        cursor.place_wrapped(REFERENCES_HEADING, &heading);
        cursor.space(8.0);
        for reference in &doc.references {
            cursor.place_wrapped(&format!("• {reference}"), &body);
            cursor.space(6.0);
        }
    }

    cursor.pages
}
