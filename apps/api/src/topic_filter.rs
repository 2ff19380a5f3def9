//! Topic allow-list. Restricts every generation route to the Newton's-laws
//! physics-education domain by plain keyword substring matching.

/// Message returned to clients whose topic falls outside the allow-list.
pub const TOPIC_DENIED_MESSAGE: &str =
    "Tema negado. Permitido somente assuntos das Leis de Newton.";

const ALLOWED_TOPICS: &[&str] = &[
    "leis de newton",
    "força",
    "movimento",
    "massa",
    "aceleração",
    "inércia",
    "gravitacional",
    "peso",
    "física",
    "dinâmica",
    "projetos",
    "resumos",
    "mapas mentais",
    "equações",
    "experimentos",
    "segunda lei",
    "terceira lei",
    "primeira lei",
    "lei da ação e reação",
    "queda livre",
    "atrito",
];

/// Returns every allow-list keyword contained in `topic` (case-insensitive).
pub fn matched_keywords(topic: &str) -> Vec<&'static str> {
    let lowered = topic.to_lowercase();
    ALLOWED_TOPICS
        .iter()
        .copied()
        .filter(|keyword| lowered.contains(keyword))
        .collect()
}

/// True when the topic mentions at least one allowed keyword.
pub fn is_allowed(topic: &str) -> bool {
    if topic.trim().is_empty() {
        return false;
    }
    let lowered = topic.to_lowercase();
    ALLOWED_TOPICS.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_topic_with_keyword() {
        assert!(is_allowed("Carrinho movido a balão: terceira lei"));
    }

    #[test]
    fn test_accepts_uppercase_accented_keyword() {
        // to_lowercase folds "Ç" and "Ã" as well
        assert!(is_allowed("LEI DA AÇÃO E REAÇÃO com foguete de garrafa"));
        assert!(is_allowed("Experimento sobre INÉRCIA"));
    }

    #[test]
    fn test_rejects_unrelated_topic() {
        assert!(!is_allowed("Receita de bolo de chocolate"));
        assert!(!is_allowed("Fotossíntese das plantas"));
    }

    #[test]
    fn test_rejects_blank_topic() {
        assert!(!is_allowed(""));
        assert!(!is_allowed("   \n"));
    }

    #[test]
    fn test_keyword_matches_inside_longer_words() {
        // substring semantics: "massa" inside "massagem" passes
        assert!(is_allowed("massagem relaxante"));
    }

    #[test]
    fn test_unaccented_spelling_is_not_folded() {
        // "forca" without cedilla is not on the list
        assert!(!is_allowed("forca centripeta"));
    }

    #[test]
    fn test_matched_keywords_lists_all_hits() {
        let hits = matched_keywords("Queda livre e atrito do ar");
        assert_eq!(hits, vec!["queda livre", "atrito"]);
    }
}
