use chrono::{Local, NaiveDate};

use super::{
    collect_periods, format_balance, period_title, FilterParams, Period, Timestamped, YearMonth,
};

/// Tracks which reporting periods have data and which one is selected.
///
/// Selection has three states: nothing selected, a year, or a year and
/// month. Besides explicit user selection, the only transition is the
/// auto-select of the latest month performed by
/// [`PeriodResolver::update_available_data`] while nothing is selected.
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    available_years: Vec<i32>,
    available_months: Vec<YearMonth>,
    selected_year: Option<i32>,
    selected_month: Option<YearMonth>,
    show_balances: bool,
}

impl PeriodResolver {
    pub fn new() -> Self {
        Self {
            available_years: Vec::new(),
            available_months: Vec::new(),
            selected_year: None,
            selected_month: None,
            show_balances: true,
        }
    }

    /// Years with data, most recent first.
    pub fn available_years(&self) -> &[i32] {
        &self.available_years
    }

    /// Year-months with data, most recent first.
    pub fn available_months(&self) -> &[YearMonth] {
        &self.available_months
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    pub fn selected_month(&self) -> Option<YearMonth> {
        self.selected_month
    }

    /// Returns the selected period.
    pub fn selection(&self) -> Period {
        match (self.selected_month, self.selected_year) {
            (Some(ym), _) => Period::Month(ym),
            (None, Some(year)) => Period::Year(year),
            (None, None) => Period::All,
        }
    }

    /// Recomputes available periods from loaded records, using today's date.
    pub fn update_available_data<E, I>(&mut self, expenses: &[E], incomes: &[I])
    where
        E: Timestamped,
        I: Timestamped,
    {
        self.update_available_data_at(expenses, incomes, Local::now().date_naive());
    }

    /// Recomputes available periods from loaded records.
    ///
    /// Records with missing or unparseable timestamps are skipped. `today`'s
    /// year and month are always available. If nothing is selected, the most
    /// recent month and its year become the selection.
    pub fn update_available_data_at<E, I>(
        &mut self,
        expenses: &[E],
        incomes: &[I],
        today: NaiveDate,
    ) where
        E: Timestamped,
        I: Timestamped,
    {
        let dates = expenses
            .iter()
            .filter_map(Timestamped::created_date)
            .chain(incomes.iter().filter_map(Timestamped::created_date));

        let (years, months) = collect_periods(dates, today);
        self.available_years = years;
        self.available_months = months;

        if self.selected_month.is_none() && self.selected_year.is_none() {
            if let Some(latest) = self.available_months.first().copied() {
                self.select_month(latest);
            }
        }
    }

    /// Selects a whole year. A selected month from another year is dropped.
    pub fn select_year(&mut self, year: i32) {
        self.selected_year = Some(year);
        if self.selected_month.is_some_and(|ym| ym.year() != year) {
            self.selected_month = None;
        }
    }

    /// Selects a month (and its year).
    pub fn select_month(&mut self, month: YearMonth) {
        self.selected_year = Some(month.year());
        self.selected_month = Some(month);
    }

    /// Drops the selected month, keeping the year.
    pub fn clear_month(&mut self) {
        self.selected_month = None;
    }

    /// Months belonging to the selected year, or every month if none is selected.
    pub fn get_months_for_selected_year(&self) -> Vec<YearMonth> {
        match self.selected_year {
            Some(year) => self
                .available_months
                .iter()
                .filter(|ym| ym.year() == year)
                .copied()
                .collect(),
            None => self.available_months.clone(),
        }
    }

    /// Query parameters for the selected period.
    pub fn get_filter_params(&self) -> FilterParams {
        FilterParams::from(self.selection())
    }

    /// Human-readable label for the selected period.
    pub fn get_period_title(&self) -> String {
        period_title(&self.selection())
    }

    /// Resets the selection. Available years and months are kept.
    pub fn clear_filters(&mut self) {
        self.selected_year = None;
        self.selected_month = None;
    }

    pub fn toggle_balances_visibility(&mut self) {
        self.show_balances = !self.show_balances;
    }

    pub fn balances_visible(&self) -> bool {
        self.show_balances
    }

    /// Formats an amount, masked if balances are hidden.
    pub fn format_balance(&self, amount: f64) -> String {
        format_balance(amount, self.show_balances)
    }
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::MASKED_BALANCE;

    struct Record(&'static str);

    impl Timestamped for Record {
        fn created_at(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    const NONE: [Record; 0] = [];

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_auto_selects_latest_month() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(&[Record("2024-01-10")], &NONE, date(2024, 1, 20));

        assert_eq!(resolver.selected_month(), Some(ym(2024, 1)));
        assert_eq!(resolver.selected_year(), Some(2024));
        assert_eq!(resolver.get_period_title(), "Enero 2024");
    }

    #[test]
    fn test_auto_select_does_not_overwrite_existing_selection() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(&[Record("2024-01-10")], &NONE, date(2024, 1, 20));
        resolver.update_available_data_at(
            &[Record("2023-06-01"), Record("2022-02-02")],
            &NONE,
            date(2024, 1, 20),
        );
        assert_eq!(resolver.selected_month(), Some(ym(2024, 1)));

        resolver.select_year(2023);
        resolver.update_available_data_at(&[Record("2023-06-01")], &NONE, date(2024, 1, 20));
        assert_eq!(resolver.selection(), Period::Year(2023));
    }

    #[test]
    fn test_auto_select_runs_again_after_clear() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(&[Record("2024-01-10")], &NONE, date(2024, 1, 20));
        resolver.clear_filters();
        assert_eq!(resolver.selection(), Period::All);
        assert_eq!(resolver.available_months(), &[ym(2024, 1)]);

        resolver.update_available_data_at(&[Record("2024-03-10")], &NONE, date(2024, 3, 20));
        assert_eq!(resolver.selected_month(), Some(ym(2024, 3)));
    }

    #[test]
    fn test_malformed_timestamps_are_excluded() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(
            &[Record("not-a-date"), Record("2022-07-04")],
            &[Record("")],
            date(2024, 5, 1),
        );
        assert_eq!(resolver.available_years(), &[2024, 2022]);
        assert_eq!(resolver.available_months(), &[ym(2024, 5), ym(2022, 7)]);
    }

    #[test]
    fn test_current_month_always_available() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(&NONE, &NONE, date(2026, 10, 19));
        assert_eq!(resolver.available_years(), &[2026]);
        assert_eq!(resolver.available_months(), &[ym(2026, 10)]);
        assert_eq!(resolver.selected_month(), Some(ym(2026, 10)));
    }

    #[test]
    fn test_incomes_and_expenses_are_merged() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(
            &[Record("2023-03-01")],
            &[Record("2023-11-30T10:00:00Z"), Record("2023-03-15")],
            date(2024, 1, 1),
        );
        assert_eq!(
            resolver.available_months(),
            &[ym(2024, 1), ym(2023, 11), ym(2023, 3)]
        );
    }

    #[test]
    fn test_months_for_selected_year() {
        let mut resolver = PeriodResolver::new();
        resolver.update_available_data_at(
            &[Record("2023-03-01"), Record("2023-11-01"), Record("2022-01-01")],
            &NONE,
            date(2024, 1, 1),
        );

        resolver.select_year(2023);
        assert_eq!(
            resolver.get_months_for_selected_year(),
            vec![ym(2023, 11), ym(2023, 3)]
        );

        resolver.clear_filters();
        assert_eq!(resolver.get_months_for_selected_year().len(), 4);
    }

    #[test]
    fn test_filter_params_per_state() {
        let mut resolver = PeriodResolver::new();
        assert!(resolver.get_filter_params().is_empty());

        resolver.select_year(2023);
        assert_eq!(
            resolver.get_filter_params(),
            FilterParams {
                year: Some(2023),
                month: None
            }
        );
        assert_eq!(resolver.get_period_title(), "Año 2023");

        resolver.select_month(ym(2024, 2));
        assert_eq!(
            resolver.get_filter_params(),
            FilterParams {
                year: Some(2024),
                month: Some(2)
            }
        );
        assert_eq!(resolver.get_period_title(), "Febrero 2024");

        resolver.clear_filters();
        assert_eq!(resolver.get_period_title(), "Todos los períodos");
    }

    #[test]
    fn test_select_year_drops_month_from_other_year() {
        let mut resolver = PeriodResolver::new();
        resolver.select_month(ym(2024, 2));
        resolver.select_year(2024);
        assert_eq!(resolver.selected_month(), Some(ym(2024, 2)));
        resolver.select_year(2023);
        assert_eq!(resolver.selected_month(), None);
        assert_eq!(resolver.selection(), Period::Year(2023));
    }

    #[test]
    fn test_toggle_balances_visibility() {
        let mut resolver = PeriodResolver::new();
        assert!(resolver.balances_visible());
        assert_eq!(resolver.format_balance(10.0), "$10.00");

        resolver.toggle_balances_visibility();
        assert!(!resolver.balances_visible());
        assert_eq!(resolver.format_balance(10.0), MASKED_BALANCE);

        resolver.toggle_balances_visibility();
        assert!(resolver.balances_visible());
    }
}
