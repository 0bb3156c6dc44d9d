use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

pub const MIN_PAST_YEARS: u32 = 1;
pub const MAX_PAST_YEARS: u32 = 50;
pub const DEFAULT_PAST_YEARS: u32 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("past years window must be within 1..=50, got {0}")]
    WindowOutOfRange(u32),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How many years into the past a detected expiry date is still accepted.
/// Always within `MIN_PAST_YEARS..=MAX_PAST_YEARS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PastYearsWindow(u32);

impl PastYearsWindow {
    pub fn new(years: u32) -> Option<Self> {
        (MIN_PAST_YEARS..=MAX_PAST_YEARS)
            .contains(&years)
            .then_some(Self(years))
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PastYearsWindow {
    fn default() -> Self {
        Self(DEFAULT_PAST_YEARS)
    }
}

impl TryFrom<u32> for PastYearsWindow {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConfigError::WindowOutOfRange(value))
    }
}

impl From<PastYearsWindow> for u32 {
    fn from(window: PastYearsWindow) -> Self {
        window.0
    }
}

impl fmt::Display for PastYearsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y", self.0)
    }
}

/// File-level engine settings, e.g. `shelfwise.toml`:
///
/// ```toml
/// past_years_window = 3
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub past_years_window: PastYearsWindow,
}

impl EngineConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Publish this config as the process-wide default.
    pub fn apply(&self) {
        set_past_years_window(f64::from(self.past_years_window.get()));
    }
}

// ── Process-wide tunable ─────────────────────────────────────────────────────

static PAST_YEARS_WINDOW: AtomicU32 = AtomicU32::new(DEFAULT_PAST_YEARS);

pub fn get_past_years_window() -> u32 {
    PAST_YEARS_WINDOW.load(Ordering::Relaxed)
}

/// Snapshot of the tunable as a typed window. Parsers read this once per call.
pub fn past_years_window() -> PastYearsWindow {
    PastYearsWindow::new(get_past_years_window()).unwrap_or_default()
}

/// Updates the process-wide window. Non-finite or out-of-range values are
/// ignored and leave the current value in place; fractions are truncated.
pub fn set_past_years_window(value: f64) {
    if !value.is_finite() {
        tracing::debug!(value, "ignoring non-finite past years window");
        return;
    }
    if value < f64::from(MIN_PAST_YEARS) || value > f64::from(MAX_PAST_YEARS) {
        tracing::debug!(value, "ignoring out-of-range past years window");
        return;
    }
    PAST_YEARS_WINDOW.store(value.trunc() as u32, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn window_bounds() {
        assert_eq!(PastYearsWindow::new(0), None);
        assert_eq!(PastYearsWindow::new(1).map(PastYearsWindow::get), Some(1));
        assert_eq!(PastYearsWindow::new(50).map(PastYearsWindow::get), Some(50));
        assert_eq!(PastYearsWindow::new(51), None);
        assert_eq!(PastYearsWindow::default().get(), 2);
    }

    #[test]
    fn config_from_toml() {
        let cfg = EngineConfig::from_toml("past_years_window = 7").unwrap();
        assert_eq!(cfg.past_years_window.get(), 7);
    }

    #[test]
    fn config_from_empty_toml_uses_default() {
        let cfg = EngineConfig::from_toml("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn config_rejects_out_of_range_window() {
        assert!(EngineConfig::from_toml("past_years_window = 0").is_err());
        assert!(EngineConfig::from_toml("past_years_window = 51").is_err());
    }

    #[test]
    fn config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "past_years_window = 4").unwrap();
        let cfg = EngineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.past_years_window.get(), 4);
    }

    #[test]
    fn config_load_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/shelfwise.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    // The only test that touches the global; it restores the default on exit.
    #[test]
    fn set_past_years_window_ignores_invalid_values() {
        set_past_years_window(5.0);
        assert_eq!(get_past_years_window(), 5);

        set_past_years_window(0.0);
        set_past_years_window(51.0);
        set_past_years_window(50.5);
        set_past_years_window(0.5);
        set_past_years_window(-3.0);
        set_past_years_window(f64::NAN);
        set_past_years_window(f64::INFINITY);
        assert_eq!(get_past_years_window(), 5);

        set_past_years_window(7.9);
        assert_eq!(get_past_years_window(), 7);
        assert_eq!(past_years_window().get(), 7);

        set_past_years_window(f64::from(DEFAULT_PAST_YEARS));
        assert_eq!(get_past_years_window(), DEFAULT_PAST_YEARS);
    }
}
