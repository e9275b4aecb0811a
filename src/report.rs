use crate::engine::{Record, Summary, DATE_FORMAT};
use chrono::NaiveDate;
use std::fmt::Write;

/// Renders a query result and its totals for terminal display.
///
/// The returned string is the full report: a range banner, one table row per
/// record, and the three summary figures. An empty result renders only the
/// no-transactions notice. The caller decides where it goes; nothing is
/// printed here.
pub fn render(records: &[Record], start: NaiveDate, end: NaiveDate) -> String {
    if records.is_empty() {
        return String::from("No transactions found in the given date range.\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nTransactions from {} to {}:",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    );
    let _ = writeln!(
        out,
        "{:<12} {:>12}  {:<8} {}",
        "date", "amount", "category", "description"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<12} {:>12.2}  {:<8} {}",
            record.date.format(DATE_FORMAT).to_string(),
            record.amount,
            record.category.to_string(),
            record.description
        );
    }

    let summary = Summary::of(records);
    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "Total Income: ${:.2}", summary.total_income);
    let _ = writeln!(out, "Total Expense: ${:.2}", summary.total_expense);
    let _ = writeln!(out, "Net Savings: ${:.2}", summary.net);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Category;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn should_render_notice_for_empty_result() {
        let out = render(&[], date("01-01-2025"), date("31-01-2025"));
        assert_eq!(out, "No transactions found in the given date range.\n");
    }

    #[test]
    fn should_render_table_rows_and_summary() {
        // Build a small result set with one record of each category.
        let records = vec![
            Record {
                date: date("01-01-2025"),
                amount: 2000.0,
                category: Category::Income,
                description: "Salary".to_string(),
            },
            Record {
                date: date("02-01-2025"),
                amount: -150.0,
                category: Category::Expense,
                description: "Groceries".to_string(),
            },
        ];

        let out = render(&records, date("01-01-2025"), date("31-01-2025"));

        // The banner reflects the queried bounds, not the record dates.
        assert!(out.contains("Transactions from 01-01-2025 to 31-01-2025:"));

        // One row per record, dates rendered back in the ledger format.
        assert!(out.contains("01-01-2025"));
        assert!(out.contains("Salary"));
        assert!(out.contains("02-01-2025"));
        assert!(out.contains("Groceries"));

        // Currency figures with two decimal places.
        assert!(out.contains("Total Income: $2000.00"));
        assert!(out.contains("Total Expense: $-150.00"));
        assert!(out.contains("Net Savings: $2150.00"));

        // No notice on a non-empty result.
        assert!(!out.contains("No transactions found"));
    }
}
