use std::path::Path;
use thiserror::Error;

use serde::Serialize;
use shelfwise_core::{Confidence, ParsedDate};

use crate::recognizer::{OcrBackend, OcrError};
use crate::resolve::ExpiryParser;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of a single capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Chosen date, or a dateless `"no_date_found"` result.
    pub best: ParsedDate,
    /// The recognized line the date was read from.
    pub source_line: Option<String>,
    /// Non-empty recognized lines, in order.
    pub raw_lines: Vec<String>,
    /// All lines joined by a space; `None` if nothing was recognized.
    pub combined_text: Option<String>,
}

/// Orchestrates: recognize → per-line extraction → combined-text retry.
pub struct ExpiryPipeline<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> ExpiryPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Process a capture stored on disk.
    pub async fn process_file(
        &self,
        path: &Path,
        parser: &ExpiryParser,
    ) -> Result<ScanResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes, parser)
    }

    /// Process raw capture bytes.
    pub fn process_bytes(
        &self,
        data: &[u8],
        parser: &ExpiryParser,
    ) -> Result<ScanResult, PipelineError> {
        let text = self.recognizer.recognize(data)?;
        Ok(scan_text(&text, parser))
    }
}

/// Picks the best date of a recognized block. When no single line carries a
/// date, the lines are joined and parsed once more, since OCR often splits
/// one printed date over several boxes.
pub fn scan_text(text: &str, parser: &ExpiryParser) -> ScanResult {
    let raw_lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    let combined = raw_lines.join(" ");
    let combined_text = (!combined.is_empty()).then_some(combined);

    if let Some(hit) = parser.best_line_match(text) {
        return ScanResult {
            best: hit.parsed,
            source_line: Some(hit.line),
            raw_lines,
            combined_text,
        };
    }

    let joined = combined_text
        .as_deref()
        .map(|c| (c, parser.parse(c)))
        .filter(|(_, p)| p.is_found());
    let (best, source_line) = match joined {
        Some((combined, mut parsed)) => {
            tracing::debug!(date = ?parsed.date, "date found only in combined text");
            parsed.confidence = parsed.confidence.cap(Confidence::Medium);
            parsed.format = format!("{} (combined)", parsed.format);
            (parsed, Some(combined.to_string()))
        }
        None => (ParsedDate::no_date_found(), None),
    };

    ScanResult { best, source_line, raw_lines, combined_text }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
