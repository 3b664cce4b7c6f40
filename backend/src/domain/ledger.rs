//! Ledger aggregation: the pure computations behind the home, analytics
//! and transaction screens.
//!
//! Everything here is a synchronous function over records already
//! materialized in memory. The live subscription model re-invokes these on
//! every store change, recomputing from the full snapshot each time instead
//! of patching previous results, so the functions must be cheap and
//! order-independent — sums over a user's monthly records, no more.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use shared::{CategorySlice, LedgerSummary, TransactionDaySection};

use crate::domain::calendar::MonthWindow;
use crate::domain::models::transaction::{Transaction, TransactionType};

/// Aggregate one user's transactions over an inclusive month window.
///
/// `total_expenses` is defined as the sum of the per-category sums, so the
/// category breakdown always adds up to it exactly. With no income in the
/// window the spent percentage is `0`, never a division by zero.
pub fn aggregate(transactions: &[Transaction], window: &MonthWindow) -> LedgerSummary {
    let mut total_income = 0.0;
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();

    for transaction in transactions {
        if !window.contains(&transaction.date) {
            continue;
        }
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                *by_category.entry(transaction.category.as_str()).or_insert(0.0) +=
                    transaction.amount;
            }
        }
    }

    let total_expenses: f64 = by_category.values().sum();

    let percentage_spent = if total_income > 0.0 {
        total_expenses / total_income * 100.0
    } else {
        0.0
    };

    let mut category_breakdown: Vec<CategorySlice> = by_category
        .into_iter()
        .map(|(category, amount_sum)| CategorySlice {
            category: category.to_string(),
            amount_sum,
            percent_of_total_expenses: if total_expenses > 0.0 {
                amount_sum / total_expenses * 100.0
            } else {
                0.0
            },
        })
        .collect();
    category_breakdown.sort_by(|a, b| {
        b.amount_sum
            .partial_cmp(&a.amount_sum)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    LedgerSummary {
        total_income,
        total_expenses,
        savings: total_income - total_expenses,
        percentage_spent,
        percentage_left: 100.0 - percentage_spent,
        category_breakdown,
    }
}

/// The unwindowed running balance over a user's entire ledger: income
/// positive, expense negative. Distinct from any monthly figure.
pub fn running_balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|t| match t.transaction_type {
            TransactionType::Income => t.amount,
            TransactionType::Expense => -t.amount,
        })
        .sum()
}

/// Display order for transaction lists: most recent `date` first, ties
/// broken by `created_at` descending, then `id` descending as the final
/// deterministic tie-break.
pub fn display_order(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// The most recent `limit` transactions as presentation DTOs.
pub fn recent(transactions: &[Transaction], limit: usize) -> Vec<shared::Transaction> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| display_order(a, b));
    ordered
        .into_iter()
        .take(limit)
        .map(shared::Transaction::from)
        .collect()
}

/// Group transactions into calendar-day sections, newest day first, for
/// the sectioned list view. Days are taken in each record's own offset —
/// the day the user saw when the record was written.
pub fn day_sections(transactions: &[Transaction]) -> Vec<TransactionDaySection> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| display_order(a, b));

    let mut sections: Vec<TransactionDaySection> = Vec::new();
    for transaction in ordered {
        let day = transaction.date.date_naive();
        match sections.last_mut() {
            Some(section) if section.date == day => {
                section.transactions.push(transaction.into());
            }
            _ => sections.push(TransactionDaySection {
                date: day,
                title: shared::format_day_heading(day),
                transactions: vec![transaction.into()],
            }),
        }
    }
    sections
}

/// Case-insensitive search across description and category, matching the
/// transaction list's search box.
pub fn matches_search(transaction: &Transaction, query: &str) -> bool {
    let query = query.to_lowercase();
    transaction.description.to_lowercase().contains(&query)
        || transaction.category.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn march() -> MonthWindow {
        MonthWindow::for_month(2024, 3, offset()).unwrap()
    }

    fn tx(
        id: &str,
        transaction_type: TransactionType,
        amount: f64,
        category: &str,
        date: &str,
    ) -> Transaction {
        let date: DateTime<FixedOffset> = date.parse().unwrap();
        Transaction {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            transaction_type,
            amount,
            category: category.to_string(),
            category_icon: "cash".to_string(),
            category_color: "#000".to_string(),
            description: format!("{} {}", category, id),
            details: String::new(),
            is_fixed: false,
            date,
            created_at: date,
        }
    }

    #[test]
    fn aggregates_the_march_example() {
        let transactions = vec![
            tx("a", TransactionType::Income, 1000.0, "Salário", "2024-03-01T09:00:00-03:00"),
            tx("b", TransactionType::Expense, 400.0, "Alimentação", "2024-03-15T12:00:00-03:00"),
        ];
        let summary = aggregate(&transactions, &march());

        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expenses, 400.0);
        assert_eq!(summary.savings, 600.0);
        assert_eq!(summary.percentage_spent, 40.0);
        assert_eq!(summary.percentage_left, 60.0);
        assert_eq!(summary.category_breakdown.len(), 1);
        assert_eq!(summary.category_breakdown[0].category, "Alimentação");
        assert_eq!(summary.category_breakdown[0].amount_sum, 400.0);
        assert_eq!(summary.category_breakdown[0].percent_of_total_expenses, 100.0);
    }

    #[test]
    fn result_is_invariant_under_input_permutation() {
        let mut transactions = vec![
            tx("a", TransactionType::Income, 1000.0, "Salário", "2024-03-01T09:00:00-03:00"),
            tx("b", TransactionType::Expense, 120.5, "Transporte", "2024-03-10T09:00:00-03:00"),
            tx("c", TransactionType::Expense, 80.25, "Lazer", "2024-03-12T09:00:00-03:00"),
            tx("d", TransactionType::Expense, 300.0, "Alimentação", "2024-03-20T09:00:00-03:00"),
        ];
        let forward = aggregate(&transactions, &march());
        transactions.reverse();
        let backward = aggregate(&transactions, &march());
        assert_eq!(forward, backward);
    }

    #[test]
    fn window_boundaries_are_inclusive_for_aggregation() {
        let transactions = vec![
            tx("start", TransactionType::Income, 10.0, "Salário", "2024-03-01T00:00:00-03:00"),
            tx("before", TransactionType::Income, 99.0, "Salário", "2024-02-29T23:59:59-03:00"),
            tx("end", TransactionType::Income, 5.0, "Salário", "2024-03-31T23:59:59-03:00"),
        ];
        let summary = aggregate(&transactions, &march());
        assert_eq!(summary.total_income, 15.0);
    }

    #[test]
    fn no_income_means_zero_percent_spent() {
        let transactions = vec![tx(
            "a",
            TransactionType::Expense,
            50.0,
            "Lazer",
            "2024-03-05T10:00:00-03:00",
        )];
        let summary = aggregate(&transactions, &march());
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.percentage_spent, 0.0);
        assert_eq!(summary.percentage_left, 100.0);
        assert_eq!(summary.category_breakdown[0].percent_of_total_expenses, 100.0);
    }

    #[test]
    fn empty_window_yields_the_empty_summary() {
        let summary = aggregate(&[], &march());
        assert_eq!(summary, LedgerSummary::empty());
    }

    #[test]
    fn category_sums_add_up_to_total_expenses_exactly() {
        let transactions = vec![
            tx("a", TransactionType::Expense, 0.1, "Alimentação", "2024-03-01T10:00:00-03:00"),
            tx("b", TransactionType::Expense, 0.2, "Transporte", "2024-03-02T10:00:00-03:00"),
            tx("c", TransactionType::Expense, 0.3, "Lazer", "2024-03-03T10:00:00-03:00"),
            tx("d", TransactionType::Expense, 0.1, "Alimentação", "2024-03-04T10:00:00-03:00"),
        ];
        let summary = aggregate(&transactions, &march());
        let breakdown_sum: f64 = summary
            .category_breakdown
            .iter()
            .map(|slice| slice.amount_sum)
            .sum();
        assert_eq!(breakdown_sum, summary.total_expenses);
    }

    #[test]
    fn breakdown_is_sorted_by_amount_then_name() {
        let transactions = vec![
            tx("a", TransactionType::Expense, 50.0, "Transporte", "2024-03-01T10:00:00-03:00"),
            tx("b", TransactionType::Expense, 200.0, "Alimentação", "2024-03-02T10:00:00-03:00"),
            tx("c", TransactionType::Expense, 50.0, "Lazer", "2024-03-03T10:00:00-03:00"),
        ];
        let summary = aggregate(&transactions, &march());
        let order: Vec<&str> = summary
            .category_breakdown
            .iter()
            .map(|slice| slice.category.as_str())
            .collect();
        assert_eq!(order, vec!["Alimentação", "Lazer", "Transporte"]);
    }

    #[test]
    fn running_balance_ignores_the_window() {
        let transactions = vec![
            tx("a", TransactionType::Income, 1000.0, "Salário", "2023-11-01T09:00:00-03:00"),
            tx("b", TransactionType::Expense, 400.0, "Moradia", "2024-03-15T12:00:00-03:00"),
        ];
        assert_eq!(running_balance(&transactions), 600.0);
    }

    #[test]
    fn recent_breaks_ties_by_created_at_then_id() {
        let date = "2024-03-10T10:00:00-03:00";
        let mut first = tx("b", TransactionType::Income, 1.0, "Salário", date);
        first.created_at = "2024-03-10T11:00:00-03:00".parse().unwrap();
        let second = tx("z", TransactionType::Income, 2.0, "Salário", date);
        let third = tx("a", TransactionType::Income, 3.0, "Salário", date);

        let listed = recent(&[third.clone(), first.clone(), second.clone()], 10);
        let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
        // Same date everywhere: later created_at wins, then higher id.
        assert_eq!(ids, vec!["b", "z", "a"]);
    }

    #[test]
    fn recent_respects_the_limit() {
        let transactions = vec![
            tx("a", TransactionType::Income, 1.0, "Salário", "2024-03-01T09:00:00-03:00"),
            tx("b", TransactionType::Income, 2.0, "Salário", "2024-03-02T09:00:00-03:00"),
            tx("c", TransactionType::Income, 3.0, "Salário", "2024-03-03T09:00:00-03:00"),
        ];
        let listed = recent(&transactions, 2);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "c");
    }

    #[test]
    fn day_sections_group_newest_day_first() {
        let transactions = vec![
            tx("a", TransactionType::Expense, 10.0, "Lazer", "2024-03-10T09:00:00-03:00"),
            tx("b", TransactionType::Expense, 20.0, "Lazer", "2024-03-12T09:00:00-03:00"),
            tx("c", TransactionType::Income, 30.0, "Salário", "2024-03-12T18:00:00-03:00"),
        ];
        let sections = day_sections(&transactions);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "12 de março");
        assert_eq!(sections[0].transactions.len(), 2);
        assert_eq!(sections[0].transactions[0].id, "c");
        assert_eq!(sections[1].title, "10 de março");
    }

    #[test]
    fn search_matches_description_and_category_case_insensitively() {
        let transaction = tx(
            "a",
            TransactionType::Expense,
            10.0,
            "Alimentação",
            "2024-03-10T09:00:00-03:00",
        );
        assert!(matches_search(&transaction, "alimen"));
        assert!(matches_search(&transaction, "ALIMENTAÇÃO"));
        assert!(!matches_search(&transaction, "transporte"));
    }
}
