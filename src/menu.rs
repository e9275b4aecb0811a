use crate::chart;
use crate::engine::{Category, Record, Store, DATE_FORMAT};
use crate::errors::MenuError;
use crate::report;
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};

/// Source of "today" for defaulted transaction dates, abstracted so menu
/// flows stay deterministic under test.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// The states the interactive loop moves through. A menu choice is read in
/// `Idle`; `Adding` and `Querying` each run one full prompt flow and drop
/// back to `Idle`; `Exiting` terminates the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    Adding,
    Querying,
    Exiting,
}

/// The interactive read-eval loop over a store.
///
/// Generic over its input and output so tests can drive full sessions from a
/// byte buffer. Validation failures on any prompt re-prompt immediately and
/// never escape; store failures abort the loop.
pub struct Menu<R, W, C> {
    store: Store,
    input: R,
    output: W,
    clock: C,
}

impl<R: BufRead, W: Write, C: Clock> Menu<R, W, C> {
    pub fn new(store: Store, input: R, output: W, clock: C) -> Self {
        Self {
            store,
            input,
            output,
            clock,
        }
    }

    /// Runs the loop until the user chooses to exit or input is exhausted.
    pub fn run(&mut self) -> Result<(), MenuError> {
        let mut state = MenuState::Idle;
        loop {
            state = match state {
                MenuState::Idle => self.choose()?,
                MenuState::Adding => {
                    self.add_transaction()?;
                    MenuState::Idle
                }
                MenuState::Querying => {
                    self.query_range()?;
                    MenuState::Idle
                }
                MenuState::Exiting => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
            };
        }
    }

    fn choose(&mut self) -> Result<MenuState, MenuError> {
        writeln!(self.output, "\n1. Add a new transaction")?;
        writeln!(
            self.output,
            "2. View transactions and summary within a date range"
        )?;
        writeln!(self.output, "3. Exit")?;
        write!(self.output, "Enter your choice (1-3): ")?;
        self.output.flush()?;

        let choice = match self.read_line()? {
            Some(line) => line,
            // Exhausted input is treated like choosing to exit.
            None => return Ok(MenuState::Exiting),
        };

        Ok(match choice.trim() {
            "1" => MenuState::Adding,
            "2" => MenuState::Querying,
            "3" => MenuState::Exiting,
            _ => {
                writeln!(self.output, "Invalid choice. Enter 1, 2, or 3.")?;
                MenuState::Idle
            }
        })
    }

    /// The add flow: date (empty defaults to today), amount, category,
    /// description, then a single append.
    fn add_transaction(&mut self) -> Result<(), MenuError> {
        let date = match self.prompt_date_or_today()? {
            Some(date) => date,
            None => return Ok(()),
        };
        let amount = match self.prompt_amount()? {
            Some(amount) => amount,
            None => return Ok(()),
        };
        let category = match self.prompt_category()? {
            Some(category) => category,
            None => return Ok(()),
        };
        let description = match self.prompt_description()? {
            Some(description) => description,
            None => return Ok(()),
        };

        let record = Record {
            date,
            amount,
            category,
            description,
        };
        self.store.append(&record)?;
        writeln!(self.output, "Entry added successfully")?;
        Ok(())
    }

    /// The query flow: start/end dates, report, then an optional chart when
    /// anything matched.
    fn query_range(&mut self) -> Result<(), MenuError> {
        let start = match self.prompt_date("Enter the start date (dd-mm-yyyy): ")? {
            Some(date) => date,
            None => return Ok(()),
        };
        let end = match self.prompt_date("Enter the end date (dd-mm-yyyy): ")? {
            Some(date) => date,
            None => return Ok(()),
        };

        let records = self.store.query(start, end)?;
        write!(self.output, "{}", report::render(&records, start, end))?;

        if records.is_empty() {
            return Ok(());
        }

        write!(self.output, "Do you want to see a plot? (y/n): ")?;
        self.output.flush()?;
        if let Some(answer) = self.read_line()? {
            if answer.trim().eq_ignore_ascii_case("y") {
                let series = chart::daily_series(&records);
                write!(self.output, "{}", chart::render(&series))?;
            }
        }
        Ok(())
    }

    fn prompt_date_or_today(&mut self) -> Result<Option<NaiveDate>, MenuError> {
        loop {
            write!(
                self.output,
                "Enter the date of the transaction (dd-mm-yyyy) or enter for today's date: "
            )?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(Some(self.clock.today()));
            }
            match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => writeln!(self.output, "Invalid date format. Please use dd-mm-yyyy.")?,
            }
        }
    }

    fn prompt_date(&mut self, prompt: &str) -> Result<Option<NaiveDate>, MenuError> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match NaiveDate::parse_from_str(line.trim(), DATE_FORMAT) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => writeln!(self.output, "Invalid date format. Please use dd-mm-yyyy.")?,
            }
        }
    }

    fn prompt_amount(&mut self) -> Result<Option<f64>, MenuError> {
        loop {
            write!(self.output, "Enter the amount: ")?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.trim().parse::<f64>() {
                Ok(amount) => return Ok(Some(amount)),
                Err(_) => writeln!(self.output, "Invalid amount. Please enter a number.")?,
            }
        }
    }

    fn prompt_category(&mut self) -> Result<Option<Category>, MenuError> {
        loop {
            write!(
                self.output,
                "Enter the category ('I' for Income or 'E' for Expense): "
            )?;
            self.output.flush()?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse_category(&line) {
                Some(category) => return Ok(Some(category)),
                None => writeln!(
                    self.output,
                    "Invalid category. Enter 'I' for Income or 'E' for Expense."
                )?,
            }
        }
    }

    fn prompt_description(&mut self) -> Result<Option<String>, MenuError> {
        write!(self.output, "Enter a description: ")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| line.trim().to_string()))
    }

    /// Reads one line without its trailing newline. None means the input is
    /// exhausted.
    fn read_line(&mut self) -> Result<Option<String>, MenuError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }
}

fn parse_category(input: &str) -> Option<Category> {
    match input.trim().to_ascii_lowercase().as_str() {
        "i" | "income" => Some(Category::Income),
        "e" | "expense" => Some(Category::Expense),
        _ => None,
    }
}
