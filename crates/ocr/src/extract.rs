use std::sync::OnceLock;

use regex::{Captures, Regex};
use shelfwise_core::{expand_year, Confidence, DateRange, ParsedDate};

use crate::registry::{lookup_month, MonthEntry};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// D/M/Y and M/D/Y share one shape; the layout decides which field is which.
re!(re_numeric_triple,
    r"(?:^|[^\d])(\d{1,2})[/\-. ](\d{1,2})[/\-. ](\d{4}|\d{2})(?:[^\d]|$)");
re!(re_iso,
    r"(?:^|[^\d])(\d{4})[/\-. ](\d{1,2})[/\-. ](\d{1,2})(?:[^\d]|$)");
re!(re_day_name_year,
    r"(?:^|[^\d])(\d{1,2})(?:er|st|nd|rd|th)?[ .\-/]*(\p{L}+)\.?[ .\-/,]*(\d{2,4})(?:[^\d]|$)");
re!(re_name_day_year,
    r"(?:^|[^\p{L}])(\p{L}+)[ .\-/]+(\d{1,2})(?:st|nd|rd|th)?[ ,/.\-]+(\d{2,4})(?:[^\d]|$)");
re!(re_name_year,
    r"(?:^|[^\p{L}])(\p{L}+)[ .\-/]+(\d{2,4})(?:[^\d]|$)");
re!(re_number_year,
    r"(?:^|[^\d])(\d{1,2})[ .\-/]+(\d{4}|\d{2})(?:[^\d]|$)");

// ── Layouts ───────────────────────────────────────────────────────────────────

/// One date layout the engine knows how to read. Every layout has the same
/// signature (`text -> Option<ParsedDate>`), so resolvers are just ordered
/// slices of layouts fed to [`first_success`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `15/03/2026`, `15-03-26`, `15.03.2026`, `15 03 2026`
    DayMonthYear,
    /// `2026-03-15`
    Iso,
    /// `03/15/2026`, only when day != month
    MonthDayYear,
    /// `15 mars 2026`, `1er avril 26`, `15-MAR-2026`
    DayMonthNameYear,
    /// `March 15, 2026`
    MonthNameDayYear,
    /// `mars 2026`, `03/2026`, `03.26`; resolves to the last day of the month
    MonthYear,
    /// `15032026`, `20260315`, `150326`, `0326`
    Compact,
}

impl Layout {
    /// Scans normalized `text` left to right and returns the first candidate
    /// of this layout that is a real calendar date inside `window`.
    pub fn apply(self, text: &str, window: DateRange) -> Option<ParsedDate> {
        match self {
            Layout::DayMonthYear => day_month_year(text, window),
            Layout::Iso => iso(text, window),
            Layout::MonthDayYear => month_day_year(text, window),
            Layout::DayMonthNameYear => day_month_name_year(text, window),
            Layout::MonthNameDayYear => month_name_day_year(text, window),
            Layout::MonthYear => month_year(text, window),
            Layout::Compact => compact(text, window),
        }
    }
}

/// Tries each layout in order and stops at the first hit.
pub fn first_success(order: &[Layout], text: &str, window: DateRange) -> Option<ParsedDate> {
    order.iter().find_map(|&layout| {
        let hit = layout.apply(text, window);
        if let Some(p) = &hit {
            tracing::trace!(?layout, date = ?p.date, "layout matched");
        }
        hit
    })
}

// ── Matchers ──────────────────────────────────────────────────────────────────

fn day_month_year(text: &str, window: DateRange) -> Option<ParsedDate> {
    scan(re_numeric_triple(), text).find_map(|c| {
        let day: u32 = c[1].parse().ok()?;
        let month: u32 = c[2].parse().ok()?;
        let (year, label) = year_field(&c[3], "DD/MM/YYYY", "DD/MM/YY")?;
        let date = window.accept(year, month, day)?;
        Some(ParsedDate::found(date, Confidence::High, label))
    })
}

fn iso(text: &str, window: DateRange) -> Option<ParsedDate> {
    scan(re_iso(), text).find_map(|c| {
        let year: i32 = c[1].parse().ok()?;
        let month: u32 = c[2].parse().ok()?;
        let day: u32 = c[3].parse().ok()?;
        let date = window.accept(year, month, day)?;
        Some(ParsedDate::found(date, Confidence::High, "YYYY-MM-DD"))
    })
}

fn month_day_year(text: &str, window: DateRange) -> Option<ParsedDate> {
    scan(re_numeric_triple(), text).find_map(|c| {
        let month: u32 = c[1].parse().ok()?;
        let day: u32 = c[2].parse().ok()?;
        // 04/04 reads the same either way; nothing to tell the US order apart.
        if day == month {
            return None;
        }
        let (year, label) = year_field(&c[3], "MM/DD/YYYY", "MM/DD/YY")?;
        let date = window.accept(year, month, day)?;
        Some(ParsedDate::found(date, Confidence::Medium, label))
    })
}

fn day_month_name_year(text: &str, window: DateRange) -> Option<ParsedDate> {
    scan(re_day_name_year(), text).find_map(|c| {
        let day: u32 = c[1].parse().ok()?;
        let entry = lookup_month(&c[2])?;
        let year = expand_year(c[3].parse().ok()?);
        let date = window.accept(year, entry.month, day)?;
        Some(named(date, Confidence::High, "DD MMM YYYY", entry))
    })
}

fn month_name_day_year(text: &str, window: DateRange) -> Option<ParsedDate> {
    scan(re_name_day_year(), text).find_map(|c| {
        let entry = lookup_month(&c[1])?;
        let day: u32 = c[2].parse().ok()?;
        let year = expand_year(c[3].parse().ok()?);
        let date = window.accept(year, entry.month, day)?;
        Some(named(date, Confidence::High, "MMM DD YYYY", entry))
    })
}

fn month_year(text: &str, window: DateRange) -> Option<ParsedDate> {
    let by_name = scan(re_name_year(), text).find_map(|c| {
        let name = c.get(1)?;
        let year_field = c.get(2)?;
        if inside_full_date(text, name.start(), year_field.end()) {
            return None;
        }
        let entry = lookup_month(name.as_str())?;
        let year = expand_year(year_field.as_str().parse().ok()?);
        let date = window.accept_month_end(year, entry.month)?;
        Some(named(date, Confidence::Medium, "MMM YYYY (end of month)", entry))
    });
    by_name.or_else(|| {
        scan(re_number_year(), text).find_map(|c| {
            let month_field = c.get(1)?;
            let year_field = c.get(2)?;
            if inside_full_date(text, month_field.start(), year_field.end()) {
                return None;
            }
            let month: u32 = month_field.as_str().parse().ok()?;
            let year = expand_year(year_field.as_str().parse().ok()?);
            let date = window.accept_month_end(year, month)?;
            Some(ParsedDate::found(date, Confidence::Medium, "MM/YYYY (end of month)"))
        })
    })
}

fn compact(text: &str, window: DateRange) -> Option<ParsedDate> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let num = |range: std::ops::Range<usize>| digits[range].parse::<u32>().ok();

    match digits.len() {
        8 => {
            let ddmmyyyy = || {
                let date = window.accept(num(4..8)? as i32, num(2..4)?, num(0..2)?)?;
                Some(ParsedDate::found(date, Confidence::High, "DDMMYYYY"))
            };
            let yyyymmdd = || {
                let date = window.accept(num(0..4)? as i32, num(4..6)?, num(6..8)?)?;
                Some(ParsedDate::found(date, Confidence::High, "YYYYMMDD"))
            };
            ddmmyyyy().or_else(yyyymmdd)
        }
        6 => {
            let year = expand_year(num(4..6)? as i32);
            let date = window.accept(year, num(2..4)?, num(0..2)?)?;
            Some(ParsedDate::found(date, Confidence::High, "DDMMYY"))
        }
        4 => {
            let year = expand_year(num(2..4)? as i32);
            let date = window.accept_month_end(year, num(0..2)?)?;
            Some(ParsedDate::found(date, Confidence::Low, "MMYY (end of month)"))
        }
        _ => None,
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Like `captures_iter`, but resumes right after the first group instead of
/// after the whole match, so a rejected candidate cannot swallow the start
/// of the next one (`31/02/2026 15/03/2026`).
fn scan<'t>(re: &'static Regex, text: &'t str) -> impl Iterator<Item = Captures<'t>> + 't {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos > text.len() {
            return None;
        }
        let caps = re.captures_at(text, pos)?;
        pos = caps.get(1).map_or(text.len() + 1, |m| m.end());
        Some(caps)
    })
}

fn year_field(raw: &str, long: &'static str, short: &'static str) -> Option<(i32, &'static str)> {
    let value: i32 = raw.parse().ok()?;
    let label = if raw.len() == 2 { short } else { long };
    Some((expand_year(value), label))
}

fn named(date: chrono::NaiveDate, confidence: Confidence, label: &str, entry: MonthEntry) -> ParsedDate {
    ParsedDate::found(date, confidence, label).with_language(entry.language)
}

/// Whether `start..end` lies within a day-month-year candidate (numeric, ISO
/// or with a month name), so the month-year matcher does not read the tail of
/// `31/02/2026` or `31 feb 2026` on its own.
fn inside_full_date(text: &str, start: usize, end: usize) -> bool {
    let covers = |c: &Captures, first: usize, last: usize| {
        matches!((c.get(first), c.get(last)), (Some(a), Some(b)) if a.start() <= start && end <= b.end())
    };
    scan(re_numeric_triple(), text).any(|c| covers(&c, 1, 3))
        || scan(re_iso(), text).any(|c| covers(&c, 1, 3))
        || scan(re_day_name_year(), text).any(|c| lookup_month(&c[2]).is_some() && covers(&c, 1, 3))
        || scan(re_name_day_year(), text).any(|c| lookup_month(&c[1]).is_some() && covers(&c, 1, 3))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
