// All LLM prompt constants for the section generators.
// Templates use `{topic}` as the only placeholder.

use crate::sections::models::Section;

/// System prompt for section generation. The model must return `{content, books, notes}`.
pub const SECTION_SYSTEM: &str = "Você deve responder APENAS em JSON válido com os campos \
    {content, books, notes}. \
    books deve conter autores e obras acadêmicas se possível.";

pub const OVERVIEW_PROMPT_TEMPLATE: &str =
    "Explique de forma acadêmica a visão geral do projeto '{topic}'.";

pub const MATERIALS_PROMPT_TEMPLATE: &str =
    "Liste materiais para o projeto '{topic}' com quantidades.";

pub const ASSEMBLY_PROMPT_TEMPLATE: &str =
    "Explique o passo a passo de montagem do projeto '{topic}'.";

pub const PROCEDURE_PROMPT_TEMPLATE: &str =
    "Explique o procedimento experimental do projeto '{topic}'.";

pub const SECTION_MAX_TOKENS: u32 = 1500;
pub const QUESTION_MAX_TOKENS: u32 = 1200;

/// Note stored when the model ignored the JSON instruction.
pub const INVALID_JSON_NOTE: &str = "JSON inválido retornado";

pub fn section_prompt(section: Section, topic: &str) -> String {
    let template = match section {
        Section::Overview => OVERVIEW_PROMPT_TEMPLATE,
        Section::Materials => MATERIALS_PROMPT_TEMPLATE,
        Section::Assembly => ASSEMBLY_PROMPT_TEMPLATE,
        Section::Procedure => PROCEDURE_PROMPT_TEMPLATE,
    };
    template.replace("{topic}", topic)
}
