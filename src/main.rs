mod app;
mod color;
mod config;
mod data;
mod display;
mod error;
mod figure;
mod report;
mod session;
mod signal;
mod ui;
mod wfdb;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use config::Cli;
use data::catalog::Catalog;
use display::NativeWindow;
use session::Session;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let metadata_path = cli.metadata_path();
    let records_root = cli.records_root();
    let catalog = match Catalog::load(&metadata_path, &records_root, cli.sort) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("{e}");
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Metadata loaded successfully.");
    println!("\nFound {} patient folders.", catalog.patient_ids.len());

    let mut session = Session::new(catalog, NativeWindow::default(), cli.list_limit);
    if let Err(e) = session.run(io::stdin().lock(), io::stdout().lock()) {
        log::error!("console I/O failed: {e}");
        eprintln!("ERROR: console I/O failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
