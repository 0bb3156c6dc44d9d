use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const FORMAT_EMPTY: &str = "empty";
pub const FORMAT_UNRECOGNIZED: &str = "unrecognized";
pub const FORMAT_NO_DATE_FOUND: &str = "no_date_found";
pub const FORMAT_BACKEND: &str = "backend";

/// Qualitative reliability of a parsed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Sort key: lower is more trustworthy.
    pub const fn rank(self) -> u8 {
        match self {
            Confidence::High => 0,
            Confidence::Medium => 1,
            Confidence::Low => 2,
        }
    }

    /// Buckets a numeric score in `0.0..=1.0`.
    pub fn from_score(score: f32) -> Self {
        let score = score.clamp(0.0, 1.0);
        if score >= 0.8 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// The lower of the two levels.
    pub fn cap(self, ceiling: Confidence) -> Self {
        if self.rank() < ceiling.rank() { ceiling } else { self }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            other => Err(format!("Unknown confidence: '{other}'")),
        }
    }
}

/// Outcome of one extraction attempt. `date == None` means nothing was
/// detected and the value must be entered by hand; `format` is a
/// human-facing provenance label and is not meant to be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDate {
    pub date: Option<NaiveDate>,
    pub confidence: Confidence,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

impl ParsedDate {
    pub fn found(date: NaiveDate, confidence: Confidence, format: impl Into<String>) -> Self {
        Self {
            date: Some(date),
            confidence,
            format: format.into(),
            detected_keyword: None,
            detected_language: None,
        }
    }

    /// A dateless result, always `Low`.
    pub fn none(format: impl Into<String>) -> Self {
        Self {
            date: None,
            confidence: Confidence::Low,
            format: format.into(),
            detected_keyword: None,
            detected_language: None,
        }
    }

    pub fn empty() -> Self {
        Self::none(FORMAT_EMPTY)
    }

    pub fn unrecognized() -> Self {
        Self::none(FORMAT_UNRECOGNIZED)
    }

    pub fn no_date_found() -> Self {
        Self::none(FORMAT_NO_DATE_FOUND)
    }

    /// Adapts a date already parsed upstream (`YYYY-MM-DD` plus a numeric score).
    pub fn from_backend(date_iso: Option<&str>, score: f32) -> Self {
        let parsed = date_iso
            .map(str::trim)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        match parsed {
            Some(date) => Self::found(date, Confidence::from_score(score), FORMAT_BACKEND),
            None => Self::unrecognized(),
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.detected_keyword = Some(keyword.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.detected_language = Some(language.into());
        self
    }

    pub fn is_found(&self) -> bool {
        self.date.is_some()
    }

    pub fn has_keyword(&self) -> bool {
        self.detected_keyword.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn confidence_rank_orders_high_first() {
        assert!(Confidence::High.rank() < Confidence::Medium.rank());
        assert!(Confidence::Medium.rank() < Confidence::Low.rank());
    }

    #[test]
    fn confidence_roundtrip() {
        for c in [Confidence::High, Confidence::Medium, Confidence::Low] {
            assert_eq!(Confidence::from_str(&c.to_string()).unwrap(), c);
        }
        assert!(Confidence::from_str("certain").is_err());
    }

    #[test]
    fn confidence_from_score_buckets() {
        assert_eq!(Confidence::from_score(0.95), Confidence::High);
        assert_eq!(Confidence::from_score(0.8), Confidence::High);
        assert_eq!(Confidence::from_score(0.55), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.2), Confidence::Low);
        assert_eq!(Confidence::from_score(7.0), Confidence::High);
        assert_eq!(Confidence::from_score(-1.0), Confidence::Low);
    }

    #[test]
    fn confidence_cap() {
        assert_eq!(Confidence::High.cap(Confidence::Medium), Confidence::Medium);
        assert_eq!(Confidence::Low.cap(Confidence::Medium), Confidence::Low);
        assert_eq!(Confidence::Medium.cap(Confidence::Medium), Confidence::Medium);
    }

    #[test]
    fn terminal_states() {
        let empty = ParsedDate::empty();
        assert_eq!(empty.date, None);
        assert_eq!(empty.confidence, Confidence::Low);
        assert_eq!(empty.format, "empty");
        assert_eq!(ParsedDate::unrecognized().format, "unrecognized");
        assert_eq!(ParsedDate::no_date_found().format, "no_date_found");
    }

    #[test]
    fn from_backend_parses_iso_and_buckets_score() {
        let p = ParsedDate::from_backend(Some("2026-06-12"), 0.9);
        assert_eq!(p.date, Some(d(2026, 6, 12)));
        assert_eq!(p.confidence, Confidence::High);
        assert_eq!(p.format, "backend");

        let p = ParsedDate::from_backend(Some("2026-06-12"), 0.6);
        assert_eq!(p.confidence, Confidence::Medium);
    }

    #[test]
    fn from_backend_without_usable_date() {
        assert_eq!(ParsedDate::from_backend(None, 0.9), ParsedDate::unrecognized());
        assert_eq!(ParsedDate::from_backend(Some("12/06/2026"), 0.9), ParsedDate::unrecognized());
        assert_eq!(ParsedDate::from_backend(Some("2026-02-30"), 0.9), ParsedDate::unrecognized());
    }

    #[test]
    fn has_keyword_ignores_empty_string() {
        let p = ParsedDate::found(d(2026, 1, 1), Confidence::High, "DD/MM/YYYY");
        assert!(!p.has_keyword());
        assert!(!p.clone().with_keyword("").has_keyword());
        assert!(p.with_keyword("dlc").has_keyword());
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_fields() {
        let p = ParsedDate::found(d(2026, 6, 12), Confidence::High, "DD/MM/YYYY")
            .with_keyword("best before")
            .with_language("en");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["date"], "2026-06-12");
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["detectedKeyword"], "best before");
        assert_eq!(json["detectedLanguage"], "en");

        let json = serde_json::to_value(ParsedDate::unrecognized()).unwrap();
        assert!(json["date"].is_null());
        assert!(json.get("detectedKeyword").is_none());
    }

    #[test]
    fn deserializes_wire_form() {
        let p: ParsedDate = serde_json::from_str(
            r#"{"date":"2026-03-31","confidence":"medium","format":"MMM YYYY (end of month)"}"#,
        )
        .unwrap();
        assert_eq!(p.date, Some(d(2026, 3, 31)));
        assert_eq!(p.confidence, Confidence::Medium);
        assert_eq!(p.detected_keyword, None);
    }
}
