use std::collections::HashSet;

use tracing::warn;

use crate::layout::encoding::to_win_ansi;
use crate::report::gate::GatedReport;
use crate::sections::models::Section;

pub const BYLINE: &str = "Gerado por: FisiQIA (IA sugerida)";
pub const REFERENCES_HEADING: &str = "Referências / Livros consultados (prioritários):";

/// Renderer-agnostic content of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub byline: String,
    pub sections: Vec<DocumentSection>,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSection {
    pub heading: String,
    pub body: String,
}

impl ReportDocument {
    /// Builds the document with every string already restricted to WinAnsi.
    pub fn from_gated(report: &GatedReport) -> Self {
        let mut replaced = 0;
        let mut encodable = |text: &str| {
            let (mapped, count) = to_win_ansi(text);
            replaced += count;
            mapped.into_owned()
        };

        let sections: Vec<DocumentSection> = Section::ALL
            .into_iter()
            .filter_map(|section| {
                report.record.section(section).map(|entry| DocumentSection {
                    heading: section.title().to_string(),
                    body: encodable(&entry.text),
                })
            })
            .collect();

        let books = Section::ALL
            .into_iter()
            .filter_map(|section| report.record.section(section))
            .flat_map(|entry| entry.books.iter().map(String::as_str));

        let title = encodable(&format!("Relatório Técnico — {}", report.topic));
        let references = dedup_references(books)
            .iter()
            .map(|book| encodable(book))
            .collect();

        if replaced > 0 {
            warn!(topic = %report.topic, replaced, "report text had characters outside WinAnsi");
        }

        Self {
            title,
            byline: BYLINE.to_string(),
            sections,
            references,
        }
    }
}

/// Trims, drops blanks, keeps the first occurrence of each reference.
pub fn dedup_references<'a>(books: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    books
        .into_iter()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .filter(|b| seen.insert(b.to_string()))
        .map(str::to_string)
        .collect()
}

/// Paragraphs separated by blank lines; each paragraph keeps its own line breaks.
pub fn paragraphs(body: &str) -> Vec<Vec<&str>> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.lines().map(str::trim_end).collect())
        .collect()
}
