//! Text canonicalization applied before any keyword or date matching.

use unicode_normalization::UnicodeNormalization;

/// Lowercase, strip diacritics, collapse whitespace runs and trim.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let folded = fold_letters(&text.to_lowercase());
    collapse_whitespace(&folded)
}

/// Decompose (NFD), drop combining marks, then spell out the letters that
/// have no decomposition (`ß`, `ł`, `ø`, ligatures).
fn fold_letters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            '\u{00DF}' => out.push_str("ss"), // ß
            '\u{0142}' => out.push('l'),      // ł
            '\u{00F8}' => out.push('o'),      // ø
            '\u{0111}' => out.push('d'),      // đ
            '\u{00E6}' => out.push_str("ae"), // æ
            '\u{0153}' => out.push_str("oe"), // œ
            '\u{2019}' | '\u{2018}' | '\u{02BC}' => out.push('\''),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            c => out.push(c),
        }
    }
    out
}

const fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |
        '\u{1AB0}'..='\u{1AFF}' |
        '\u{1DC0}'..='\u{1DFF}' |
        '\u{20D0}'..='\u{20FF}' |
        '\u{FE20}'..='\u{FE2F}'
    )
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_accents() {
        assert_eq!(normalize("À CONSOMMER de préférence avant"), "a consommer de preference avant");
        assert_eq!(normalize("Décembre"), "decembre");
        assert_eq!(normalize("MÄRZ"), "marz");
        assert_eq!(normalize("março"), "marco");
    }

    #[test]
    fn spells_out_sharp_s_and_polish_l() {
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("NALEŻY SPOŻYĆ DO"), "nalezy spozyc do");
        assert_eq!(normalize("Wałbrzych"), "walbrzych");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  best\t\tbefore \n 12/06/2026  "), "best before 12/06/2026");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "DLC : 15 MARS 2025 — lot 2504",
            "Mindestens haltbar bis: 03.04.26",
            "ÉÈÊË àâä îï ôö ùûü ç ß Œuf",
            "Consumir preferentemente antes del 1 de diciembre",
            "",
            "  ",
            "x\u{0301}\u{0301}y",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
