use clap::{App, Arg};
use std::path::PathBuf;

use crate::engine::StoreConfig;

const DEFAULT_DATA_FILE: &str = "finance_data.csv";

pub struct Args {
    pub data_file: PathBuf,
}

impl Args {
    pub fn parse() -> Self {
        let matches = App::new("cashflow")
            .version("0.1.0")
            .about("interactive personal income/expense ledger")
            .arg(
                Arg::with_name("data_file")
                    .short("f")
                    .long("file")
                    .takes_value(true)
                    .help("path of the CSV ledger file to read and append to"),
            )
            .get_matches();

        Self {
            data_file: PathBuf::from(matches.value_of("data_file").unwrap_or(DEFAULT_DATA_FILE)),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.data_file.clone())
    }
}
