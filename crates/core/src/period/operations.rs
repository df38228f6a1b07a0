use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::{Period, Timestamped, YearMonth};

/// Collects the distinct years and year-months of a set of dates.
///
/// `today`'s year and month are always included. Both lists come back
/// sorted descending (most recent first).
pub fn collect_periods<I>(dates: I, today: NaiveDate) -> (Vec<i32>, Vec<YearMonth>)
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut years = BTreeSet::new();
    let mut months = BTreeSet::new();

    for date in dates.into_iter().chain(std::iter::once(today)) {
        years.insert(date.year());
        months.insert(YearMonth::from_date(date));
    }

    (
        years.into_iter().rev().collect(),
        months.into_iter().rev().collect(),
    )
}

/// Filters records to those created within a period.
///
/// Records without a parseable timestamp only pass the `All` period.
pub fn filter_by_period<'a, T: Timestamped>(records: &'a [T], period: &Period) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| match period {
            Period::All => true,
            _ => record
                .created_date()
                .is_some_and(|date| period.contains(date)),
        })
        .collect()
}
