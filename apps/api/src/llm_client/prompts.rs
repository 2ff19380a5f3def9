// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Você é um assistente preciso e estruturado. \
    Responda APENAS com JSON válido. \
    NÃO inclua texto fora do objeto JSON. \
    NÃO use blocos de código markdown.";
