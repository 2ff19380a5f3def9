// Prompt constants for the model-based consistency check.

/// Consistency prompt template. Replace `{topic}` and `{sections_json}` before sending.
pub const CONSISTENCY_PROMPT_TEMPLATE: &str = r#"As quatro seções abaixo foram geradas separadamente para o projeto escolar '{topic}'.
Verifique se todas descrevem o MESMO projeto (mesmo experimento, mesmos materiais, mesma montagem).

SEÇÕES (objeto JSON: nome da seção -> texto):
{sections_json}

Retorne um objeto JSON com este esquema EXATO:
{
  "consistent": true,
  "mismatch": ["montagem"],
  "explanation": "Breve justificativa"
}

Regras:
- "mismatch" só pode conter os nomes: "visao", "materiais", "montagem", "procedimento"
- Se consistent for true, "mismatch" deve ser []"#;

pub const CONSISTENCY_MAX_TOKENS: u32 = 400;
