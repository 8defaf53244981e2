//! Monetary rules shared by the server (authoritative) and the console (provisional totals).

use chrono::{DateTime, Duration, Utc};

/// Largest total a single sale or rental may reach, keeps stored and summed amounts finite
pub const MAX_TRANSACTION_TOTAL: f64 = 1e12;

fn checked_amount(amount: f64) -> Option<f64> {
    if !amount.is_finite() || amount > MAX_TRANSACTION_TOTAL {
        return None;
    }
    Some((amount * 100.0).round() / 100.0)
}

/// Total price of a sale, `quantity × unit_price`, `None` above [`MAX_TRANSACTION_TOTAL`]
pub fn sale_total(unit_price: f64, quantity: i32) -> Option<f64> {
    checked_amount(unit_price * f64::from(quantity))
}

/// Total cost of a rental, `days × daily_rate × quantity`, `None` above [`MAX_TRANSACTION_TOTAL`]
pub fn rental_cost(daily_rate: f64, days: i32, quantity: i32) -> Option<f64> {
    checked_amount(daily_rate * f64::from(days) * f64::from(quantity))
}

/// `None` when the date falls outside the calendar chrono can represent
pub fn expected_return_date(rental_date: DateTime<Utc>, days: i32) -> Option<DateTime<Utc>> {
    rental_date.checked_add_signed(Duration::try_days(i64::from(days))?)
}
