//! Maps report text onto the WinAnsi (cp1252) repertoire of the builtin PDF fonts.
//!
//! The PDF writer silently skips any character the encoding lacks, so text is
//! mapped before layout: common math and Greek symbols are spelled out, and
//! anything else becomes a visible `?`.

use std::borrow::Cow;

const REPLACEMENT: char = '?';

/// cp1252 code points 0x80..=0x9F that are not in Latin-1.
const CP1252_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

pub fn is_win_ansi(c: char) -> bool {
    matches!(c, '\n' | '\r' | ' '..='~' | '\u{A0}'..='\u{FF}') || CP1252_EXTRAS.contains(&c)
}

fn transliterate(c: char) -> Option<&'static str> {
    let spelled = match c {
        '\t' => " ",
        'Δ' | '∆' => "Delta",
        'δ' => "delta",
        'θ' => "theta",
        'α' => "alfa",
        'β' => "beta",
        'γ' => "gama",
        'λ' => "lambda",
        'μ' => "µ",
        'π' => "pi",
        'ρ' => "rho",
        'σ' => "sigma",
        'Σ' | '∑' => "Soma",
        'τ' => "tau",
        'φ' => "phi",
        'ω' => "omega",
        'Ω' => "Ohm",
        'ε' => "epsilon",
        '→' => "->",
        '←' => "<-",
        '↔' => "<->",
        '⇒' => "=>",
        '≈' => "~",
        '≠' => "!=",
        '≤' => "<=",
        '≥' => ">=",
        '−' => "-",
        '√' => "raiz",
        '∞' => "infinito",
        '∫' => "integral",
        '⁰' => "^0",
        '⁴' => "^4",
        '⁵' => "^5",
        '⁶' => "^6",
        '⁷' => "^7",
        '⁸' => "^8",
        '⁹' => "^9",
        '⁻' => "^-",
        '₀' => "0",
        '₁' => "1",
        '₂' => "2",
        '₃' => "3",
        '₄' => "4",
        _ => return None,
    };
    Some(spelled)
}

/// Returns `text` restricted to WinAnsi plus the number of characters replaced.
/// No character is dropped: each one maps to itself, a spelled-out form, or `?`.
pub fn to_win_ansi(text: &str) -> (Cow<'_, str>, usize) {
    if text.chars().all(is_win_ansi) {
        return (Cow::Borrowed(text), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;
    for c in text.chars() {
        if is_win_ansi(c) {
            out.push(c);
            continue;
        }
        replaced += 1;
        match transliterate(c) {
            Some(spelled) => out.push_str(spelled),
            None => out.push(REPLACEMENT),
        }
    }
    (Cow::Owned(out), replaced)
}
