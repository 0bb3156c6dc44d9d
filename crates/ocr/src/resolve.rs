use chrono::{Local, NaiveDate};
use shelfwise_core::{days_until, past_years_window, DateRange, ParsedDate, PastYearsWindow};

use crate::extract::{first_success, Layout};
use crate::normalize::normalize;
use crate::registry::{find_keyword, strip_keywords};

/// Layout order once a keyword has anchored the text. US M/D/Y is left out:
/// anchored text follows the packaging's own locale.
pub const KEYWORD_ORDER: &[Layout] = &[
    Layout::DayMonthYear,
    Layout::Iso,
    Layout::DayMonthNameYear,
    Layout::MonthNameDayYear,
    Layout::MonthYear,
    Layout::Compact,
];

/// Layout order for unanchored text; the ambiguous US order goes last.
pub const WHOLE_TEXT_ORDER: &[Layout] = &[
    Layout::DayMonthYear,
    Layout::Iso,
    Layout::DayMonthNameYear,
    Layout::MonthNameDayYear,
    Layout::Compact,
    Layout::MonthYear,
    Layout::MonthDayYear,
];

/// Expiry-date extraction with a fixed reasonableness window.
///
/// A parser is a snapshot: the window and `today` are fixed when it is
/// built, so every layout tried within one call sees the same bounds even if
/// the process-wide setting changes meanwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryParser {
    window: DateRange,
    today: NaiveDate,
}

impl ExpiryParser {
    pub fn new(past_years: PastYearsWindow, today: NaiveDate) -> Self {
        Self { window: DateRange::reasonable_expiry(today, past_years), today }
    }

    /// Reads the process-wide window and the local calendar date once.
    pub fn snapshot() -> Self {
        Self::new(past_years_window(), Local::now().date_naive())
    }

    pub fn window(&self) -> DateRange {
        self.window
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Days from this parser's `today` to a parsed date; negative once expired.
    pub fn days_remaining(&self, parsed: &ParsedDate) -> Option<i64> {
        parsed.date.map(|date| days_until(date, self.today))
    }

    /// Extracts an expiry date from one string. Never fails: blank input
    /// yields `"empty"` and text without a usable date `"unrecognized"`.
    pub fn parse(&self, text: &str) -> ParsedDate {
        if text.trim().is_empty() {
            return ParsedDate::empty();
        }
        let normalized = normalize(text);
        // A keyword-anchored hit wins even when its own confidence is lower.
        if let Some(anchored) = self.near_keyword(&normalized) {
            return anchored;
        }
        self.whole_text(&normalized)
            .unwrap_or_else(ParsedDate::unrecognized)
    }

    /// Looks for a date right after the leftmost expiry keyword.
    pub fn near_keyword(&self, normalized: &str) -> Option<ParsedDate> {
        let hit = find_keyword(normalized)?;
        let remainder = &normalized[hit.end..];
        tracing::debug!(keyword = hit.entry.phrase, remainder, "expiry keyword found");

        let parsed = first_success(KEYWORD_ORDER, remainder, self.window)?;
        Some(
            parsed
                .with_keyword(hit.entry.phrase)
                .with_language(hit.entry.language),
        )
    }

    /// Scans the whole text with every layout, first with keywords removed,
    /// then, if that found nothing, as is: stripping can eat part of a date.
    pub fn whole_text(&self, normalized: &str) -> Option<ParsedDate> {
        let cleaned = strip_keywords(normalized);
        first_success(WHOLE_TEXT_ORDER, &cleaned, self.window).or_else(|| {
            if cleaned == normalized {
                return None;
            }
            first_success(WHOLE_TEXT_ORDER, normalized, self.window)
        })
    }
}

impl Default for ExpiryParser {
    fn default() -> Self {
        Self::snapshot()
    }
}

/// Parses `text` with the process-wide window and today's local date.
pub fn parse_expiry_date(text: &str) -> ParsedDate {
    ExpiryParser::snapshot().parse(text)
}
