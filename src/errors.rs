use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::io;

#[derive(Debug)]
pub enum InitError {
    Io(io::Error),
    Csv(csv::Error),
}

#[derive(Debug)]
pub enum AppendError {
    Io(io::Error),
    Csv(csv::Error),
}

#[derive(Debug)]
pub enum QueryError {
    Read(csv::Error),
}

/// Any failure that aborts the interactive loop: a prompt read/write error or
/// a fatal store operation underneath one of the menu flows.
#[derive(Debug)]
pub enum MenuError {
    Io(io::Error),
    Append(AppendError),
    Query(QueryError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Io(err) => write!(f, "failed to create ledger file: {}", err),
            InitError::Csv(err) => write!(f, "failed to write seed rows: {}", err),
        }
    }
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppendError::Io(err) => write!(f, "failed to open ledger file for append: {}", err),
            AppendError::Csv(err) => write!(f, "failed to write transaction row: {}", err),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Read(err) => write!(f, "failed to read ledger file: {}", err),
        }
    }
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::Io(err) => write!(f, "terminal i/o failed: {}", err),
            MenuError::Append(err) => write!(f, "{}", err),
            MenuError::Query(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for InitError {
    fn from(err: io::Error) -> Self {
        InitError::Io(err)
    }
}

impl From<csv::Error> for InitError {
    fn from(err: csv::Error) -> Self {
        InitError::Csv(err)
    }
}

impl From<io::Error> for AppendError {
    fn from(err: io::Error) -> Self {
        AppendError::Io(err)
    }
}

impl From<csv::Error> for AppendError {
    fn from(err: csv::Error) -> Self {
        AppendError::Csv(err)
    }
}

impl From<csv::Error> for QueryError {
    fn from(err: csv::Error) -> Self {
        QueryError::Read(err)
    }
}

impl From<io::Error> for MenuError {
    fn from(err: io::Error) -> Self {
        MenuError::Io(err)
    }
}

impl From<AppendError> for MenuError {
    fn from(err: AppendError) -> Self {
        MenuError::Append(err)
    }
}

impl From<QueryError> for MenuError {
    fn from(err: QueryError) -> Self {
        MenuError::Query(err)
    }
}

impl Error for InitError {}
impl Error for AppendError {}
impl Error for QueryError {}
impl Error for MenuError {}
