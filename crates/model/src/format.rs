//! Rendering helpers for movie fields.

use chrono::{Datelike, NaiveDate};

/// Currency prefix used for every revenue figure
pub const REVENUE_PREFIX: &str = "US$ ";

/// Render a revenue amount as `US$ 924,317,558`.
pub fn format_revenue(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{REVENUE_PREFIX}{sign}{grouped}")
}

/// Year component of an ISO `YYYY-MM-DD` date
pub fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
