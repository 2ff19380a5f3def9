//! PDF rendering with printpdf builtin fonts.
//!
//! CPU-bound; callers run it inside `tokio::task::spawn_blocking`.

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};
use thiserror::Error;

use crate::layout::font_metrics::ReportFont;
use crate::layout::page::{layout_report, Page, PageConfig, TextColor};
use crate::report::document::ReportDocument;

const LAYER_NAME: &str = "Conteúdo";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: ReportFont) -> &IndirectFontRef {
        match font {
            ReportFont::Helvetica => &self.regular,
            ReportFont::HelveticaBold => &self.bold,
        }
    }
}

/// Lays out and renders the report, returning the PDF bytes.
pub fn render_pdf(doc: &ReportDocument, config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let pages = layout_report(doc, config);
    let width = Mm(config.page_width_mm);
    let height = Mm(config.page_height_mm);

    let (pdf, first_page, first_layer) = PdfDocument::new(doc.title.as_str(), width, height, LAYER_NAME);
    let fonts = Fonts {
        regular: pdf.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_ref, layer_ref) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_ref).get_layer(layer_ref)
        };
        draw_page(&layer, page, &fonts, config);
    }

    Ok(pdf.save_to_bytes()?)
}

fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &Fonts, config: &PageConfig) {
    let (r, g, b) = config.heading_color;
    let mut active: Option<TextColor> = None;

    for line in &page.lines {
        if active != Some(line.color) {
            let color = match line.color {
                TextColor::Black => Rgb::new(0.0, 0.0, 0.0, None),
                TextColor::Heading => Rgb::new(r, g, b, None),
            };
            layer.set_fill_color(Color::Rgb(color));
            active = Some(line.color);
        }
        layer.use_text(
            line.text.as_str(),
            line.size_pt,
            Mm(line.x_mm),
            Mm(line.y_mm),
            fonts.get(line.font),
        );
    }
}
