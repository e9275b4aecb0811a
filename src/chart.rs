use crate::engine::{Category, Record, DATE_FORMAT};
use chrono::NaiveDate;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// One day of summed activity inside a queried range.
#[derive(Clone, Debug, PartialEq)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

/// Collapses records into a per-day series covering every date between the
/// earliest and latest record, inclusive. Days with no records carry zeros so
/// the rendered series has no gaps.
pub fn daily_series(records: &[Record]) -> Vec<DayTotals> {
    let first = match records.iter().map(|r| r.date).min() {
        Some(date) => date,
        None => return Vec::new(),
    };
    let last = records.iter().map(|r| r.date).max().unwrap_or(first);

    let mut series = Vec::new();
    let mut day = first;
    loop {
        let mut totals = DayTotals {
            date: day,
            income: 0.0,
            expense: 0.0,
        };
        for record in records.iter().filter(|r| r.date == day) {
            match record.category {
                Category::Income => totals.income += record.amount,
                Category::Expense => totals.expense += record.amount,
            }
        }
        series.push(totals);

        if day >= last {
            break;
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    series
}

/// Renders the per-day series as a fixed-width terminal chart, one line per
/// day with the income and expense bars side by side. Bars are scaled against
/// the largest absolute amount in the series.
pub fn render(series: &[DayTotals]) -> String {
    let mut out = String::new();
    if series.is_empty() {
        return out;
    }

    let peak = series
        .iter()
        .flat_map(|day| [day.income.abs(), day.expense.abs()])
        .fold(0.0f64, f64::max);

    let _ = writeln!(out, "\nIncome (+) and Expenses (-) Over Time");
    let _ = writeln!(
        out,
        "{:<12} {:<width$} {:>10}   {:<width$} {:>10}",
        "date",
        "income",
        "",
        "expense",
        "",
        width = BAR_WIDTH,
    );
    for day in series {
        let _ = writeln!(
            out,
            "{:<12} {:<width$} {:>10.2}   {:<width$} {:>10.2}",
            day.date.format(DATE_FORMAT).to_string(),
            bar(day.income, peak),
            day.income,
            bar(day.expense, peak),
            day.expense,
            width = BAR_WIDTH,
        );
    }
    out
}

fn bar(value: f64, peak: f64) -> String {
    if peak == 0.0 {
        return String::new();
    }
    let len = ((value.abs() / peak) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.min(BAR_WIDTH))
}
