//! Interest and yield for a single loan offer.

use crate::domain::Calculation;

/// Share of income kept after the platform commission.
const NET_OF_COMMISSION: f64 = 0.955;

const DAYS_PER_YEAR: f64 = 365.0;

/// Placeholder shown for every output when inputs are unusable.
pub const NO_VALUE: &str = "-";

/// Compute incomes and the effective annual yield.
///
/// `rate` is an annual percentage and `period` a number of days. Inputs may
/// use `,` as the decimal separator.
pub fn calculate(amount_raw: &str, rate_raw: &str, period_raw: &str) -> Calculation {
    let (Some(amount), Some(rate), Some(period)) = (
        parse_input(amount_raw),
        parse_input(rate_raw),
        parse_input(period_raw),
    ) else {
        return Calculation::empty();
    };
    if period == 0.0 {
        return Calculation::empty();
    }

    let interest = amount * (rate / 100.0) * (period / DAYS_PER_YEAR);
    let income_with_commission = amount + interest;
    let income_without_commission = income_with_commission * NET_OF_COMMISSION;
    let real_annual_yield =
        ((income_without_commission - amount) / amount) * (DAYS_PER_YEAR / period) * 100.0;

    Calculation {
        income_with_commission: format!("{income_with_commission:.2}"),
        income_without_commission: format!("{income_without_commission:.2}"),
        real_annual_yield: if real_annual_yield.is_finite() {
            format!("{real_annual_yield:.2}%")
        } else {
            NO_VALUE.to_string()
        },
    }
}

/// Form input: every `,` is a decimal separator (`"1,5"` -> 1.5).
fn parse_input(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl Calculation {
    pub fn empty() -> Self {
        Self {
            income_with_commission: NO_VALUE.to_string(),
            income_without_commission: NO_VALUE.to_string(),
            real_annual_yield: NO_VALUE.to_string(),
        }
    }
}
