use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Text is not valid UTF-8: {0}")]
    TextDecode(#[from] std::string::FromUtf8Error),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// Anything that turns captured bytes into recognized text, one line per
/// recognized box. Image recognition itself lives outside this crate.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, data: &[u8]) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string regardless of input.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _data: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Plain-text backend ────────────────────────────────────────────────────────

/// Treats the input as already-recognized UTF-8 text (manual entry, text
/// exported by an external OCR tool).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRecognizer;

impl OcrBackend for PlainTextRecognizer {
    fn recognize(&self, data: &[u8]) -> Result<String, OcrError> {
        Ok(String::from_utf8(data.to_vec())?)
    }
}
