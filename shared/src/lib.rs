//! Shared DTO types for the Finan backend.
//!
//! These are the presentation-facing shapes: what screens bind to when they
//! render the ledger, the challenge cards, and the sectioned transaction
//! list. The backend crate maps its domain models into these types; nothing
//! in here performs I/O or talks to the record store.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Type of transaction for rendering and business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in (salary, sales, gifts...).
    Income,
    /// Money going out (food, transport, leisure...).
    Expense,
}

/// A single transaction as rendered by list screens.
///
/// `date` and `created_at` are RFC 3339 strings; presentation code only
/// needs them for display and the backend has already applied all ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub transaction_type: TransactionType,
    /// Always non-negative; the sign of the movement comes from
    /// `transaction_type`, never from the amount itself.
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub category_icon: String,
    pub category_color: String,
    pub is_fixed: bool,
    pub date: String,
    pub created_at: String,
}

/// One expense category's share of a month's spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount_sum: f64,
    /// Percentage of the month's total expenses, `0` when there are no
    /// expenses in the window.
    pub percent_of_total_expenses: f64,
}

/// Monthly ledger aggregate for the analytics and home screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// `total_income - total_expenses`; negative when the month overspent.
    pub savings: f64,
    /// `total_expenses / total_income * 100`, `0` when there is no income.
    pub percentage_spent: f64,
    pub percentage_left: f64,
    /// Sorted by `amount_sum` descending, then category name.
    pub category_breakdown: Vec<CategorySlice>,
}

impl LedgerSummary {
    /// The all-zero summary rendered for a month with no usable records.
    pub fn empty() -> Self {
        LedgerSummary {
            total_income: 0.0,
            total_expenses: 0.0,
            savings: 0.0,
            percentage_spent: 0.0,
            percentage_left: 100.0,
            category_breakdown: Vec::new(),
        }
    }
}

/// A savings challenge card with its display-ready completion percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub id: String,
    pub title: String,
    pub icon_name: String,
    pub icon_type: String,
    pub color: String,
    pub goal_amount: f64,
    /// Raw stored value; may exceed the goal or go negative.
    pub current_amount: f64,
    /// Clamped to `[0, 100]` for the progress bar.
    pub completion_percent: f64,
}

/// One calendar day's transactions for the sectioned list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDaySection {
    pub date: NaiveDate,
    /// Localized heading, e.g. `"15 de março"`.
    pub title: String,
    pub transactions: Vec<Transaction>,
}

/// Portuguese month names, indexed by `month - 1`.
const MONTH_NAMES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Month name in pt-BR, or `"?"` for an out-of-range month number.
pub fn month_name_pt(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES_PT[(month - 1) as usize],
        _ => "?",
    }
}

/// Day heading in the `"15 de março"` style used by the transaction list.
pub fn format_day_heading(date: NaiveDate) -> String {
    format!("{} de {}", date.day(), month_name_pt(date.month()))
}

/// Format a currency value the way the app renders BRL: `R$ 1.234,56`,
/// with a leading minus for negative values.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_values() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(9.5), "R$ 9,50");
        assert_eq!(format_brl(400.0), "R$ 400,00");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(13320.75), "R$ 13.320,75");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn negative_values_take_a_leading_minus() {
        assert_eq!(format_brl(-50.0), "-R$ 50,00");
        assert_eq!(format_brl(-1234.5), "-R$ 1.234,50");
    }

    #[test]
    fn day_headings_use_portuguese_month_names() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(format_day_heading(date), "15 de março");
    }
}
