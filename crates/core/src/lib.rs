pub mod config;
pub mod parsed;
pub mod period;

pub use chrono::NaiveDate as CalendarDate;
pub use config::{
    get_past_years_window, past_years_window, set_past_years_window, ConfigError, EngineConfig,
    PastYearsWindow,
};
pub use parsed::{Confidence, ParsedDate};
pub use period::{days_until, end_of_month, expand_year, DateRange};
