use crate::errors::{AppendError, InitError, QueryError};
use chrono::NaiveDate;
use csv::Trim;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const PRECISION: f64 = 100.0;

/// The text form every transaction date is persisted and prompted in.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Serde adapter pinning `NaiveDate` to the `DD-MM-YYYY` column format.
mod ledger_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(super::DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), super::DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Category {
    /// Money coming in. The stored amount is conventionally positive, but the
    /// sign is not enforced against the category.
    Income,

    /// Money going out. The stored amount is conventionally negative, but the
    /// sign is not enforced against the category.
    Expense,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Income => write!(f, "Income"),
            Category::Expense => write!(f, "Expense"),
        }
    }
}

/// One ledger entry: a dated, categorized amount with a free-text note.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Record {
    #[serde(with = "ledger_date")]
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
}

/// Storage settings resolved at startup and handed to the store, so nothing
/// below the CLI layer reaches for a hard-coded path.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// The append-only CSV store holding every recorded transaction.
///
/// One file handle is opened per call and released when the call returns; no
/// state is cached between operations.
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Ensures the backing file exists, creating it with the header row and
    /// the fixed sample records when it is missing.
    ///
    /// Idempotent: an existing file is left untouched, whether or not it
    /// still contains the sample rows. Returns true when seeding happened so
    /// the caller can announce it.
    pub fn initialize(&self) -> Result<bool, InitError> {
        if self.config.path.exists() {
            tracing::debug!(path = %self.config.path.display(), "ledger file already present");
            return Ok(false);
        }

        // Writer::from_path emits the header row from the Record field names
        // ahead of the first serialized row.
        let mut wtr = csv::Writer::from_path(&self.config.path)?;
        for record in seed_records() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;

        tracing::debug!(path = %self.config.path.display(), "seeded new ledger file");
        Ok(true)
    }

    /// Serializes one record onto the end of the file.
    ///
    /// The file must already exist; `initialize` guarantees that for every
    /// path this store was constructed with. Failures are underlying I/O or
    /// serialization errors and are not retried.
    pub fn append(&self, record: &Record) -> Result<(), AppendError> {
        let file = OpenOptions::new().append(true).open(&self.config.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        wtr.serialize(record)?;
        wtr.flush()?;

        Ok(())
    }

    /// Returns every stored record whose date falls within `start..=end`, in
    /// file order.
    ///
    /// Rows that fail to decode (an unparseable date, a malformed amount or
    /// category) are logged and excluded rather than surfaced; only a hard
    /// I/O failure aborts the query. An empty result is not an error.
    pub fn query(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Record>, QueryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .trim(Trim::All)
            .from_path(&self.config.path)?;

        let mut matches = Vec::new();
        for row in rdr.deserialize::<Record>() {
            let record = match row {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed ledger row");
                    continue;
                }
            };

            if record.date >= start && record.date <= end {
                matches.push(record);
            }
        }

        Ok(matches)
    }
}

/// Aggregate totals over a queried slice of records.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
}

impl Summary {
    /// Sums income and expense amounts and derives the net figure. Pure over
    /// its input; an empty slice yields all zeros.
    pub fn of(records: &[Record]) -> Self {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;

        for record in records {
            match record.category {
                Category::Income => total_income += record.amount,
                Category::Expense => total_expense += record.amount,
            }
        }

        let total_income = round(total_income);
        let total_expense = round(total_expense);
        Self {
            total_income,
            total_expense,
            net: round(total_income - total_expense),
        }
    }
}

fn round(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

/// Sample rows written on first initialization so a fresh ledger has enough
/// data to report and plot against.
fn seed_records() -> Vec<Record> {
    let rows = [
        (1, 2000.0, Category::Income, "Salary"),
        (2, -150.0, Category::Expense, "Groceries"),
        (3, 500.0, Category::Income, "Freelance work"),
        (4, -200.0, Category::Expense, "Transport"),
        (5, -100.0, Category::Expense, "Entertainment"),
        (6, 1000.0, Category::Income, "Investment Returns"),
        (7, -50.0, Category::Expense, "Snacks"),
        (8, -300.0, Category::Expense, "Rent"),
        (9, 1500.0, Category::Income, "Freelance work"),
        (10, -250.0, Category::Expense, "Utilities"),
        (11, 100.0, Category::Income, "Side project"),
        (12, -200.0, Category::Expense, "Groceries"),
        (13, -150.0, Category::Expense, "Transport"),
        (14, 2500.0, Category::Income, "Salary"),
        (15, -300.0, Category::Expense, "Insurance"),
    ];

    rows.iter()
        .map(|&(day, amount, category, description)| Record {
            date: NaiveDate::from_ymd_opt(2025, 1, day).expect("seed dates are valid"),
            amount,
            category,
            description: description.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(StoreConfig::new(dir.path().join("finance_data.csv")));
        (dir, store)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn record(date_str: &str, amount: f64, category: Category, description: &str) -> Record {
        Record {
            date: date(date_str),
            amount,
            category,
            description: description.to_string(),
        }
    }

    #[test]
    fn should_seed_a_missing_ledger_file() {
        // Create a store pointed at a path that does not exist yet and
        // initialize it.
        let (_dir, store) = temp_store();
        assert!(store.initialize().unwrap());

        // Query the full seed window and verify all fifteen sample rows come
        // back in file order with their fields intact.
        let records = store.query(date("01-01-2025"), date("15-01-2025")).unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(
            records[0],
            record("01-01-2025", 2000.0, Category::Income, "Salary")
        );
        assert_eq!(
            records[14],
            record("15-01-2025", -300.0, Category::Expense, "Insurance")
        );
    }

    #[test]
    fn should_not_reseed_an_existing_ledger_file() {
        // Initialize the same store twice.
        let (_dir, store) = temp_store();
        assert!(store.initialize().unwrap());
        assert!(!store.initialize().unwrap());

        // The second call must be a no-op: still fifteen rows, not thirty.
        let records = store.query(date("01-01-2025"), date("15-01-2025")).unwrap();
        assert_eq!(records.len(), 15);
    }

    #[test]
    fn should_round_trip_an_appended_record() {
        // Seed a store and append a coffee purchase in March, well outside
        // the seed window.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let coffee = record("15-03-2025", -75.0, Category::Expense, "Coffee");
        store.append(&coffee).unwrap();

        // A query covering March returns exactly that record, unchanged.
        let records = store.query(date("01-03-2025"), date("31-03-2025")).unwrap();
        assert_eq!(records, vec![coffee]);

        // And the expense total reflects the appended amount.
        let summary = Summary::of(&records);
        assert_eq!(summary.total_expense, -75.0);
    }

    #[test]
    fn should_round_trip_a_description_with_delimiters() {
        // Append a record whose description contains the CSV delimiter and a
        // quote; the writer quotes it on the way out.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let dinner = record(
            "20-02-2025",
            -42.5,
            Category::Expense,
            "Dinner, drinks and a \"show\"",
        );
        store.append(&dinner).unwrap();

        let records = store.query(date("20-02-2025"), date("20-02-2025")).unwrap();
        assert_eq!(records, vec![dinner]);
    }

    #[test]
    fn should_treat_range_bounds_as_inclusive() {
        // Append records on the exact boundary dates and one in between.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        store
            .append(&record("01-02-2025", 10.0, Category::Income, "first"))
            .unwrap();
        store
            .append(&record("10-02-2025", 20.0, Category::Income, "middle"))
            .unwrap();
        store
            .append(&record("28-02-2025", 30.0, Category::Income, "last"))
            .unwrap();

        // Querying exactly [first, last] includes both endpoints.
        let records = store.query(date("01-02-2025"), date("28-02-2025")).unwrap();
        assert_eq!(records.len(), 3);

        // Narrowing either bound by one day drops the matching endpoint.
        let records = store.query(date("02-02-2025"), date("28-02-2025")).unwrap();
        assert_eq!(records.len(), 2);
        let records = store.query(date("01-02-2025"), date("27-02-2025")).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn should_return_empty_for_a_range_with_no_records() {
        // The seed data lives in January 2025; query a later year.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();

        let records = store.query(date("01-01-2030"), date("31-12-2030")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn should_preserve_insertion_order() {
        // Append records out of date order.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        store
            .append(&record("20-05-2025", 1.0, Category::Income, "later"))
            .unwrap();
        store
            .append(&record("05-05-2025", 2.0, Category::Income, "earlier"))
            .unwrap();

        // The query result follows file order, not calendar order.
        let records = store.query(date("01-05-2025"), date("31-05-2025")).unwrap();
        assert_eq!(records[0].description, "later");
        assert_eq!(records[1].description, "earlier");
    }

    #[test]
    fn should_permit_duplicate_records() {
        // Append the identical record twice; the store has no uniqueness
        // constraint.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let rent = record("01-04-2025", -300.0, Category::Expense, "Rent");
        store.append(&rent).unwrap();
        store.append(&rent).unwrap();

        let records = store.query(date("01-04-2025"), date("30-04-2025")).unwrap();
        assert_eq!(records, vec![rent.clone(), rent]);
    }

    #[test]
    fn should_not_validate_amount_sign_against_category() {
        // An Income row with a negative amount is stored and returned as-is.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let refund = record("02-06-2025", -120.0, Category::Income, "Refund reversal");
        store.append(&refund).unwrap();

        let records = store.query(date("02-06-2025"), date("02-06-2025")).unwrap();
        assert_eq!(records, vec![refund]);
    }

    #[test]
    fn should_exclude_rows_with_unparseable_dates() {
        // Seed a store, then smuggle a row with an impossible month straight
        // into the file, followed by a valid row.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "31-13-2025,10,Income,Bad month").unwrap();
        drop(file);
        store
            .append(&record("01-07-2025", 10.0, Category::Income, "Good row"))
            .unwrap();

        // The malformed row never shows up, no matter how wide the range.
        let records = store.query(date("01-01-2000"), date("31-12-2099")).unwrap();
        assert!(records.iter().all(|r| r.description != "Bad month"));
        assert!(records.iter().any(|r| r.description == "Good row"));
    }

    #[test]
    fn should_exclude_rows_with_malformed_amounts() {
        // A row whose amount is not numeric is dropped, not raised.
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "03-07-2025,lots,Income,Bad amount").unwrap();
        drop(file);

        let records = store.query(date("03-07-2025"), date("03-07-2025")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn should_fail_to_append_to_a_missing_file() {
        // Build a store but skip initialize so the file does not exist.
        let (_dir, store) = temp_store();

        let err = store
            .append(&record("01-01-2025", 1.0, Category::Income, "nope"))
            .unwrap_err();
        assert!(matches!(err, AppendError::Io(_)));
    }

    #[test]
    fn should_compute_zero_totals_for_no_records() {
        let summary = Summary::of(&[]);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn should_compute_net_from_income_and_expense() {
        // Expenses are stored negative, so the net figure grows when they are
        // subtracted. This mirrors how the totals have always been derived.
        let records = vec![
            record("01-01-2025", 100.0, Category::Income, "pay"),
            record("02-01-2025", -40.0, Category::Expense, "food"),
        ];

        let summary = Summary::of(&records);
        assert_eq!(summary.total_income, 100.0);
        assert_eq!(summary.total_expense, -40.0);
        assert_eq!(summary.net, summary.total_income - summary.total_expense);
        assert_eq!(summary.net, 140.0);
    }

    #[test]
    fn should_round_summary_totals() {
        // Two amounts that do not sum cleanly in binary floating point round
        // to two decimal places.
        let records = vec![
            record("01-01-2025", 10.004, Category::Income, "a"),
            record("02-01-2025", 20.003, Category::Income, "b"),
        ];

        let summary = Summary::of(&records);
        assert_eq!(summary.total_income, 30.01);
    }
}
