//! Greedy word wrap against the static font metrics.

use crate::layout::font_metrics::FontMetricTable;

/// Wraps one logical line of text into printed lines no wider than `max_width_pt`.
///
/// Words wider than a full line are split at character boundaries.
/// Returns no lines for whitespace-only input.
pub fn wrap_line(text: &str, metrics: &FontMetricTable, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let space_w = metrics.space_width * size_pt;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_pt(word, size_pt);

        if word_w > max_width_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            let mut pieces = split_word(word, metrics, size_pt, max_width_pt);
            // The last piece may still share its line with following words.
            if let Some(last) = pieces.pop() {
                lines.extend(pieces);
                current_width = metrics.measure_pt(&last, size_pt);
                current = last;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_pt {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word(word: &str, metrics: &FontMetricTable, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = metrics.measure_pt(c.encode_utf8(&mut buf), size_pt);
        if !piece.is_empty() && width + char_w > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += char_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, ReportFont};

    fn body() -> &'static FontMetricTable {
        get_metrics(ReportFont::Helvetica)
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let lines = wrap_line("Queda livre", body(), 11.0, 400.0);
        assert_eq!(lines, vec!["Queda livre"]);
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert!(wrap_line("   \t ", body(), 11.0, 400.0).is_empty());
    }

    #[test]
    fn test_wrapped_lines_fit_width() {
        let text = "A segunda lei de Newton relaciona a força resultante aplicada sobre um corpo \
            com a massa desse corpo e a aceleração que ele adquire durante o movimento.";
        let max = 150.0;
        let lines = wrap_line(text, body(), 11.0, max);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(body().measure_pt(line, 11.0) <= max, "too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "m".repeat(40);
        let max = 50.0;
        let lines = wrap_line(&format!("{word} fim"), body(), 11.0, max);
        assert!(lines.len() > 2);
        for line in &lines {
            assert!(body().measure_pt(line, 11.0) <= max);
        }
        assert_eq!(lines.concat().replace(' ', ""), format!("{word}fim"));
    }
}
