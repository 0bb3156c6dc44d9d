pub mod aggregate;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod recognizer;
pub mod registry;
pub mod resolve;

pub use aggregate::{find_dates_in_ocr_text, get_best_date_from_ocr, LineMatch};
pub use extract::{first_success, Layout};
pub use normalize::normalize;
pub use pipeline::{scan_text, ExpiryPipeline, PipelineError, ScanResult};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, PlainTextRecognizer};
pub use registry::{contains_expiry_keyword, find_keyword, strip_keywords, KeywordHit, Language};
pub use resolve::{parse_expiry_date, ExpiryParser};

pub use shelfwise_core::{CalendarDate, Confidence, ParsedDate, PastYearsWindow};
