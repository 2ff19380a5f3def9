use std::fmt;

use serde::{Deserialize, Serialize};

/// The four fixed parts of a project report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "visao")]
    Overview,
    #[serde(rename = "materiais")]
    Materials,
    #[serde(rename = "montagem")]
    Assembly,
    #[serde(rename = "procedimento")]
    Procedure,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Materials,
        Section::Assembly,
        Section::Procedure,
    ];

    /// Wire name, also the route segment (`/visao`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Overview => "visao",
            Section::Materials => "materiais",
            Section::Assembly => "montagem",
            Section::Procedure => "procedimento",
        }
    }

    /// Heading used in the PDF report.
    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Visão Geral",
            Section::Materials => "Materiais",
            Section::Assembly => "Montagem",
            Section::Procedure => "Procedimento",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated section as returned to the client and cached per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSection {
    pub content: String,
    #[serde(default)]
    pub books: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl GeneratedSection {
    /// Answer shown to the client when the upstream call failed.
    pub fn degraded(error: impl fmt::Display) -> Self {
        Self {
            content: format!("Erro ao gerar resposta: {error}"),
            books: vec![],
            notes: String::new(),
        }
    }
}
