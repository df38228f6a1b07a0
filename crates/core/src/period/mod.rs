//! Reporting periods derived from transaction timestamps.

mod error;
mod format;
mod operations;
mod resolver;
mod timestamps;
mod types;

pub use error::PeriodError;
pub use format::{format_amount, format_balance, month_name, period_title, MASKED_BALANCE};
pub use operations::{collect_periods, filter_by_period};
pub use resolver::PeriodResolver;
pub use timestamps::{parse_timestamp, Timestamped};
pub use types::{FilterParams, Period, YearMonth};
