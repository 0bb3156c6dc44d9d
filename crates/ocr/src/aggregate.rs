use shelfwise_core::ParsedDate;

use crate::resolve::ExpiryParser;

/// A dated line of an OCR block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// Zero-based position of the line in the block.
    pub line_index: usize,
    pub line: String,
    pub parsed: ParsedDate,
}

impl ExpiryParser {
    /// Parses every line of `block` and returns the dated ones, most
    /// confident first. Lines of equal confidence keep their block order.
    pub fn find_line_matches(&self, block: &str) -> Vec<LineMatch> {
        let mut matches: Vec<LineMatch> = block
            .lines()
            .enumerate()
            .filter_map(|(line_index, line)| {
                let parsed = self.parse(line);
                parsed.is_found().then(|| LineMatch {
                    line_index,
                    line: line.trim().to_string(),
                    parsed,
                })
            })
            .collect();
        // sort_by_key is stable.
        matches.sort_by_key(|m| m.parsed.confidence.rank());
        matches
    }

    /// The line a human should confirm: the first keyword-anchored match if
    /// any, otherwise the most confident one.
    pub fn best_line_match(&self, block: &str) -> Option<LineMatch> {
        let mut matches = self.find_line_matches(block);
        if matches.is_empty() {
            return None;
        }
        let pick = matches
            .iter()
            .position(|m| m.parsed.has_keyword())
            .unwrap_or(0);
        let best = matches.swap_remove(pick);
        tracing::debug!(
            line = best.line_index,
            date = ?best.parsed.date,
            format = %best.parsed.format,
            "best OCR line"
        );
        Some(best)
    }

    pub fn find_dates_in_ocr_text(&self, block: &str) -> Vec<ParsedDate> {
        self.find_line_matches(block)
            .into_iter()
            .map(|m| m.parsed)
            .collect()
    }

    pub fn best_date_from_ocr(&self, block: &str) -> ParsedDate {
        self.best_line_match(block)
            .map(|m| m.parsed)
            .unwrap_or_else(ParsedDate::no_date_found)
    }
}

/// All dated lines of a multi-line OCR block, most confident first.
pub fn find_dates_in_ocr_text(block: &str) -> Vec<ParsedDate> {
    ExpiryParser::snapshot().find_dates_in_ocr_text(block)
}

/// Best single date of a multi-line OCR block, or `"no_date_found"`.
pub fn get_best_date_from_ocr(block: &str) -> ParsedDate {
    ExpiryParser::snapshot().best_date_from_ocr(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shelfwise_core::{Confidence, PastYearsWindow};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn parser() -> ExpiryParser {
        ExpiryParser::new(PastYearsWindow::default(), d(2026, 10, 18))
    }

    #[test]
    fn best_date_picks_keyword_line_from_noisy_block() {
        let best = parser().best_date_from_ocr("ABC123\nBest before 12/06/2026\nqty 4x250g");
        assert_eq!(best.date, Some(d(2026, 6, 12)));
        assert_eq!(best.confidence, Confidence::High);
        assert_eq!(best.detected_keyword.as_deref(), Some("best before"));
    }

    #[test]
    fn find_dates_orders_by_confidence() {
        let found = parser().find_dates_in_ocr_text("0327\n15/03/2026");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].confidence, Confidence::High);
        assert_eq!(found[0].date, Some(d(2026, 3, 15)));
        assert_eq!(found[1].confidence, Confidence::Low);
        assert_eq!(found[1].date, Some(d(2027, 3, 31)));
    }

    #[test]
    fn find_dates_is_stable_within_a_confidence_level() {
        let found = parser().find_dates_in_ocr_text("20/03/2026\nmars 2027\n15/03/2026");
        let dates: Vec<_> = found.iter().map(|p| p.date.unwrap()).collect();
        assert_eq!(dates, [d(2026, 3, 20), d(2026, 3, 15), d(2027, 3, 31)]);
    }

    #[test]
    fn keyword_line_wins_over_more_confident_line() {
        let block = "15/03/2026\nEXP 04/2027";
        let best = parser().best_date_from_ocr(block);
        assert_eq!(best.date, Some(d(2027, 4, 30)));
        assert_eq!(best.confidence, Confidence::Medium);

        let lines = parser().find_line_matches(block);
        assert_eq!(lines[0].line_index, 0);
        assert_eq!(lines[1].line, "EXP 04/2027");
    }

    #[test]
    fn falls_back_to_most_confident_without_keywords() {
        let best = parser().best_date_from_ocr("mars 2027\n15/03/2026");
        assert_eq!(best.date, Some(d(2026, 3, 15)));
        assert_eq!(best.detected_keyword, None);
    }

    #[test]
    fn no_date_found() {
        assert_eq!(parser().best_date_from_ocr(""), ParsedDate::no_date_found());
        assert_eq!(parser().best_date_from_ocr("NUTELLA\n400 g\n"), ParsedDate::no_date_found());
        assert!(parser().find_dates_in_ocr_text("\n\n").is_empty());
    }

    #[test]
    fn handles_crlf_line_breaks() {
        let found = parser().find_line_matches("lot 42\r\nDLC 01/12/2026\r\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].parsed.date, Some(d(2026, 12, 1)));
        assert_eq!(found[0].line, "DLC 01/12/2026");
        assert_eq!(found[0].line_index, 1);
    }

    #[test]
    fn free_functions_use_process_window() {
        let soon = chrono::Local::now().date_naive() + chrono::Days::new(60);
        let block = format!("PRODUIT FRAIS\nA consommer avant le {}", soon.format("%d.%m.%Y"));
        let best = get_best_date_from_ocr(&block);
        assert_eq!(best.date, Some(soon));
        assert_eq!(best.detected_keyword.as_deref(), Some("a consommer avant"));
        assert_eq!(find_dates_in_ocr_text(&block).len(), 1);
    }
}
