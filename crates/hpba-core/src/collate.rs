//! Name ordering for Japanese display.
//!
//! Folds the differences a Japanese reader does not treat as ordering
//! differences (full-width vs. half-width Latin, katakana vs. hiragana,
//! letter case) before comparing, then breaks ties on the raw text so the
//! order is total and deterministic.

use std::cmp::Ordering;

/// Compare two salon names for display ordering.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(|c| fold_char(c).to_lowercase())
}

fn fold_char(c: char) -> char {
    let code = u32::from(c);
    let folded = match code {
        // Full-width ASCII variants.
        0xFF01..=0xFF5E => code - 0xFEE0,
        // Ideographic space.
        0x3000 => 0x20,
        // Katakana ァ..ヶ onto hiragana ぁ..ゖ.
        0x30A1..=0x30F6 => code - 0x60,
        _ => code,
    };
    char::from_u32(folded).unwrap_or(c)
}
