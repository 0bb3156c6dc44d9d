//! Static multilingual expiry keywords and month names.
//!
//! All entries are already normalized (lowercase, no diacritics). Iteration
//! order is language-then-entry and is significant: on any collision the
//! first entry wins, so longer phrases come before their own prefixes.

use std::sync::OnceLock;

use crate::normalize::normalize;

pub struct Language {
    pub code: &'static str,
    pub keywords: &'static [&'static str],
    pub months: &'static [(&'static str, u32)],
}

pub static LANGUAGES: &[Language] = &[
    Language {
        code: "fr",
        keywords: &[
            "a consommer de preference avant",
            "a consommer avant",
            "a consommer jusqu",
            "date limite de consommation",
            "date limite",
            "date de peremption",
            "peremption",
            "dlc",
            "ddm",
            "dluo",
            "valable jusqu",
        ],
        months: &[
            ("janvier", 1), ("janv", 1), ("jan", 1),
            ("fevrier", 2), ("fevr", 2), ("fev", 2),
            ("mars", 3), ("mar", 3),
            ("avril", 4), ("avr", 4),
            ("mai", 5),
            ("juin", 6), ("jun", 6),
            ("juillet", 7), ("juil", 7), ("jul", 7),
            ("aout", 8), ("aou", 8),
            ("septembre", 9), ("sept", 9), ("sep", 9),
            ("octobre", 10), ("oct", 10),
            ("novembre", 11), ("nov", 11),
            ("decembre", 12), ("dec", 12),
        ],
    },
    Language {
        code: "en",
        keywords: &[
            "best before end",
            "best before",
            "best by",
            "use by",
            "use before",
            "sell by",
            "expiry date",
            "expiry",
            "expiration date",
            "expiration",
            "expires",
            "exp date",
            "exp",
            "bbe",
            "bb",
        ],
        months: &[
            ("january", 1), ("jan", 1),
            ("february", 2), ("feb", 2),
            ("march", 3), ("mar", 3),
            ("april", 4), ("apr", 4),
            ("may", 5),
            ("june", 6), ("jun", 6),
            ("july", 7), ("jul", 7),
            ("august", 8), ("aug", 8),
            ("september", 9), ("sept", 9), ("sep", 9),
            ("october", 10), ("oct", 10),
            ("november", 11), ("nov", 11),
            ("december", 12), ("dec", 12),
        ],
    },
    Language {
        code: "de",
        keywords: &[
            "mindestens haltbar bis",
            "zu verbrauchen bis",
            "verbrauchsdatum",
            "haltbar bis",
            "mhd",
        ],
        months: &[
            ("januar", 1), ("jan", 1),
            ("februar", 2), ("feb", 2),
            ("marz", 3), ("maerz", 3), ("mrz", 3),
            ("april", 4), ("apr", 4),
            ("mai", 5),
            ("juni", 6), ("jun", 6),
            ("juli", 7), ("jul", 7),
            ("august", 8), ("aug", 8),
            ("september", 9), ("sep", 9),
            ("oktober", 10), ("okt", 10),
            ("november", 11), ("nov", 11),
            ("dezember", 12), ("dez", 12),
        ],
    },
    Language {
        code: "es",
        keywords: &[
            "consumir preferentemente antes del",
            "consumir preferentemente antes",
            "fecha de caducidad",
            "caducidad",
            "consumir antes del",
            "consumir antes",
        ],
        months: &[
            ("enero", 1), ("ene", 1),
            ("febrero", 2), ("feb", 2),
            ("marzo", 3), ("mar", 3),
            ("abril", 4), ("abr", 4),
            ("mayo", 5), ("may", 5),
            ("junio", 6), ("jun", 6),
            ("julio", 7), ("jul", 7),
            ("agosto", 8), ("ago", 8),
            ("septiembre", 9), ("setiembre", 9), ("sep", 9),
            ("octubre", 10), ("oct", 10),
            ("noviembre", 11), ("nov", 11),
            ("diciembre", 12), ("dic", 12),
        ],
    },
    Language {
        code: "it",
        keywords: &[
            "da consumarsi preferibilmente entro",
            "da consumare entro",
            "scadenza",
            "scad",
        ],
        months: &[
            ("gennaio", 1), ("gen", 1),
            ("febbraio", 2), ("feb", 2),
            ("marzo", 3), ("mar", 3),
            ("aprile", 4), ("apr", 4),
            ("maggio", 5), ("mag", 5),
            ("giugno", 6), ("giu", 6),
            ("luglio", 7), ("lug", 7),
            ("agosto", 8), ("ago", 8),
            ("settembre", 9), ("set", 9),
            ("ottobre", 10), ("ott", 10),
            ("novembre", 11), ("nov", 11),
            ("dicembre", 12), ("dic", 12),
        ],
    },
    Language {
        code: "pt",
        keywords: &[
            "consumir de preferencia antes de",
            "consumir de preferencia antes",
            "data de validade",
            "validade",
            "val",
        ],
        months: &[
            ("janeiro", 1), ("jan", 1),
            ("fevereiro", 2), ("fev", 2),
            ("marco", 3), ("mar", 3),
            ("abril", 4), ("abr", 4),
            ("maio", 5), ("mai", 5),
            ("junho", 6), ("jun", 6),
            ("julho", 7), ("jul", 7),
            ("agosto", 8), ("ago", 8),
            ("setembro", 9), ("set", 9),
            ("outubro", 10), ("out", 10),
            ("novembro", 11), ("nov", 11),
            ("dezembro", 12), ("dez", 12),
        ],
    },
    Language {
        code: "nl",
        keywords: &[
            "ten minste houdbaar tot",
            "tenminste houdbaar tot",
            "te gebruiken tot",
            "tht",
            "tgt",
        ],
        months: &[
            ("januari", 1), ("jan", 1),
            ("februari", 2), ("feb", 2),
            ("maart", 3), ("mrt", 3),
            ("april", 4), ("apr", 4),
            ("mei", 5),
            ("juni", 6), ("jun", 6),
            ("juli", 7), ("jul", 7),
            ("augustus", 8), ("aug", 8),
            ("september", 9), ("sep", 9),
            ("oktober", 10), ("okt", 10),
            ("november", 11), ("nov", 11),
            ("december", 12), ("dec", 12),
        ],
    },
    Language {
        code: "pl",
        keywords: &[
            "najlepiej spozyc przed",
            "nalezy spozyc do",
            "termin przydatnosci",
            "data waznosci",
            "spozyc przed",
        ],
        months: &[
            ("styczen", 1), ("stycznia", 1), ("sty", 1),
            ("luty", 2), ("lutego", 2), ("lut", 2),
            ("marzec", 3), ("marca", 3),
            ("kwiecien", 4), ("kwietnia", 4), ("kwi", 4),
            ("maj", 5), ("maja", 5),
            ("czerwiec", 6), ("czerwca", 6), ("cze", 6),
            ("lipiec", 7), ("lipca", 7), ("lip", 7),
            ("sierpien", 8), ("sierpnia", 8), ("sie", 8),
            ("wrzesien", 9), ("wrzesnia", 9), ("wrz", 9),
            ("pazdziernik", 10), ("pazdziernika", 10), ("paz", 10),
            ("listopad", 11), ("listopada", 11), ("lis", 11),
            ("grudzien", 12), ("grudnia", 12), ("gru", 12),
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    pub phrase: &'static str,
    pub language: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthEntry {
    pub name: &'static str,
    pub month: u32,
    pub language: &'static str,
}

/// Every keyword of every language, in registry order.
pub fn keywords() -> &'static [KeywordEntry] {
    static ALL: OnceLock<Vec<KeywordEntry>> = OnceLock::new();
    ALL.get_or_init(|| {
        LANGUAGES
            .iter()
            .flat_map(|lang| {
                lang.keywords
                    .iter()
                    .map(move |&phrase| KeywordEntry { phrase, language: lang.code })
            })
            .collect()
    })
}

/// Every month name of every language, in registry order.
pub fn months() -> &'static [MonthEntry] {
    static ALL: OnceLock<Vec<MonthEntry>> = OnceLock::new();
    ALL.get_or_init(|| {
        LANGUAGES
            .iter()
            .flat_map(|lang| {
                lang.months
                    .iter()
                    .map(move |&(name, month)| MonthEntry { name, month, language: lang.code })
            })
            .collect()
    })
}

pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Resolves a month-name token: exact match first, then the first registry
/// name the token is a truncation of (`"decemb"`, `"septemb."`). Truncations
/// need at least three letters. A trailing abbreviation dot is ignored.
pub fn lookup_month(token: &str) -> Option<MonthEntry> {
    let token = token.trim_end_matches('.');
    let all = months();
    all.iter()
        .find(|m| m.name == token)
        .or_else(|| {
            if token.chars().count() < MIN_TRUNCATED_MONTH {
                return None;
            }
            all.iter().find(|m| m.name.starts_with(token))
        })
        .copied()
}

const MIN_TRUNCATED_MONTH: usize = 3;

// ── Keyword scanning ──────────────────────────────────────────────────────────

/// A keyword occurrence in normalized text. `end` is the byte offset just
/// past the keyword and any separator run that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit {
    pub entry: KeywordEntry,
    pub start: usize,
    pub end: usize,
}

/// Leftmost keyword in `text` (already normalized). On a tie the entry that
/// comes first in registry order wins.
pub fn find_keyword(text: &str) -> Option<KeywordHit> {
    let mut best: Option<KeywordHit> = None;
    for entry in keywords() {
        let Some(start) = find_bounded(text, entry.phrase) else {
            continue;
        };
        if best.map_or(true, |b| start < b.start) {
            let end = skip_separators(text, start + entry.phrase.len());
            best = Some(KeywordHit { entry: *entry, start, end });
        }
    }
    best
}

/// Removes every keyword (and the separators right after it) from
/// normalized text.
pub fn strip_keywords(text: &str) -> String {
    let mut current = text.to_string();
    while let Some(hit) = find_keyword(&current) {
        current = format!("{} {}", &current[..hit.start], &current[hit.end..]);
    }
    crate::normalize::collapse_whitespace(&current)
}

/// Whether raw (not yet normalized) text mentions any expiry keyword.
pub fn contains_expiry_keyword(text: &str) -> bool {
    find_keyword(&normalize(text)).is_some()
}

/// First occurrence of `phrase` not glued to a neighbouring letter.
fn find_bounded(text: &str, phrase: &str) -> Option<usize> {
    text.match_indices(phrase).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}

fn skip_separators(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start_matches(|c: char| !c.is_alphanumeric()).len())
}
