use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PeriodError;

/// A calendar month, rendered as `YYYY-MM`.
///
/// Ordering is chronological, so sorting descending puts the most recent
/// month first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Returns the year-month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns the last day of the month.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// The reporting period currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// No selection: every record applies.
    #[default]
    All,
    Year(i32),
    Month(YearMonth),
}

impl Period {
    /// Returns the inclusive date range covered, or `None` for `All`.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Period::All => None,
            Period::Year(year) => Some((
                NaiveDate::from_ymd_opt(*year, 1, 1)?,
                NaiveDate::from_ymd_opt(*year, 12, 31)?,
            )),
            Period::Month(ym) => Some((ym.first_day()?, ym.last_day()?)),
        }
    }

    /// Returns true if the date falls within this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.date_range() {
            Some((start, end)) => (start..=end).contains(&date),
            None => matches!(self, Period::All),
        }
    }
}

/// Query parameters sent to the backend for the selected period.
///
/// Serializes to `{}`, `{"year": ..}` or `{"year": .., "month": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }

    /// Returns these params as a JSON object, for cache key derivation.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(year) = self.year {
            map.insert("year".to_string(), Value::from(year));
        }
        if let Some(month) = self.month {
            map.insert("month".to_string(), Value::from(month));
        }
        Value::Object(map)
    }

    /// Returns the period these params describe.
    ///
    /// A month without a year, or an out-of-range month, falls back to the
    /// widest period the remaining fields allow.
    pub fn period(&self) -> Period {
        match (self.year, self.month) {
            (Some(year), Some(month)) => YearMonth::new(year, month)
                .map(Period::Month)
                .unwrap_or(Period::Year(year)),
            (Some(year), None) => Period::Year(year),
            _ => Period::All,
        }
    }
}

impl From<Period> for FilterParams {
    fn from(period: Period) -> Self {
        match period {
            Period::All => FilterParams::default(),
            Period::Year(year) => FilterParams {
                year: Some(year),
                month: None,
            },
            Period::Month(ym) => FilterParams {
                year: Some(ym.year()),
                month: Some(ym.month()),
            },
        }
    }
}
