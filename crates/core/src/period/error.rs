use thiserror::Error;

/// Errors that can occur when parsing or building periods.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid year-month (expected YYYY-MM): {0}")]
    InvalidYearMonth(String),
    #[error("Month out of range (1-12): {0}")]
    InvalidMonth(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_error_display() {
        assert_eq!(
            PeriodError::InvalidYearMonth("2024/01".to_string()).to_string(),
            "Invalid year-month (expected YYYY-MM): 2024/01"
        );
        assert_eq!(
            PeriodError::InvalidMonth(13).to_string(),
            "Month out of range (1-12): 13"
        );
    }
}
