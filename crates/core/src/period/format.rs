use super::Period;

/// Placeholder shown instead of monetary values while balances are hidden.
pub const MASKED_BALANCE: &str = "••••••";

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Returns the Spanish month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// Returns the human-readable label for a period.
///
/// # Examples
///
/// ```
/// use finanzas_core::period::{period_title, Period, YearMonth};
///
/// assert_eq!(period_title(&Period::All), "Todos los períodos");
/// assert_eq!(period_title(&Period::Year(2024)), "Año 2024");
/// let march = YearMonth::new(2024, 3).unwrap();
/// assert_eq!(period_title(&Period::Month(march)), "Marzo 2024");
/// ```
pub fn period_title(period: &Period) -> String {
    match period {
        Period::All => "Todos los períodos".to_string(),
        Period::Year(year) => format!("Año {}", year),
        Period::Month(ym) => match month_name(ym.month()) {
            Some(name) => format!("{} {}", name, ym.year()),
            None => ym.to_string(),
        },
    }
}

/// Formats an amount as `$1,234.56`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, fraction)
}

/// Formats an amount, or the masked placeholder when balances are hidden.
pub fn format_balance(amount: f64, visible: bool) -> String {
    if visible {
        format_amount(amount)
    } else {
        MASKED_BALANCE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), Some("Enero"));
        assert_eq!(month_name(12), Some("Diciembre"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_period_titles() {
        assert_eq!(period_title(&Period::All), "Todos los períodos");
        assert_eq!(period_title(&Period::Year(2023)), "Año 2023");
        let ym = YearMonth::new(2024, 1).unwrap();
        assert_eq!(period_title(&Period::Month(ym)), "Enero 2024");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(5.5), "$5.50");
        assert_eq!(format_amount(1234.567), "$1,234.57");
        assert_eq!(format_amount(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_amount(-250.0), "-$250.00");
        assert_eq!(format_amount(-0.001), "$0.00");
    }

    #[test]
    fn test_format_balance_masks() {
        assert_eq!(format_balance(99.0, true), "$99.00");
        assert_eq!(format_balance(99.0, false), MASKED_BALANCE);
    }
}
