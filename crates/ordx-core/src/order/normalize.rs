//! Whitespace normalization of visible page text.

/// Characters that break label/value adjacency but are not Unicode whitespace.
const INVISIBLE: [char; 4] = ['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'];

/// Collapse every run of whitespace (line breaks, tabs, non-breaking spaces)
/// into a single space and trim both ends.
///
/// Zero-width characters are dropped so that labels and amounts separated by
/// layout artifacts still read as contiguous text.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        let word = word.replace(INVISIBLE, "");
        if word.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_layout_whitespace() {
        let text = "  Subtotal\n\n   $75.71\t\tTaxes\u{00a0}\u{00a0}$5.00\r\n";
        assert_eq!(normalize_text(text), "Subtotal $75.71 Taxes $5.00");
    }

    #[test]
    fn test_drops_zero_width_characters() {
        assert_eq!(normalize_text("Total\u{200b} \u{feff} $1.00"), "Total $1.00");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_text("Delivery\n fee \u{2003}$5.00");
        assert_eq!(normalize_text(&once), once);
    }
}
