use cashflow::args::Args;
use cashflow::engine::Store;
use cashflow::menu::{Menu, SystemClock};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let store = Store::new(args.store_config());

    match store.initialize() {
        Ok(true) => println!("Sample data added successfully."),
        Ok(false) => {}
        Err(err) => {
            eprintln!("failed to initialize ledger file: {}", err);
            process::exit(1);
        }
    }

    let stdin = io::stdin();
    let mut menu = Menu::new(store, stdin.lock(), io::stdout(), SystemClock);
    if let Err(err) = menu.run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
