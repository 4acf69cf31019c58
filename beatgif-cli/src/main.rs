// beatgif-cli/src/main.rs
//
// Entry point of the `beatgif` binary.
//
// Loads the configuration, sets up logging, converts the clip given on the
// command line and maps the outcome to the process exit status: 0 when every
// output was written (a degraded metadata lookup included), 1 when the clip
// was aborted or any output failed. A missing argument is only a warning.

use std::path::Path;
use std::process;

use beatgif_cli::{Cli, run_convert, terminal};
use beatgif_core::{CoreError, load_config, setup_logging};
use clap::Parser;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

const USAGE_HINT: &str =
    "No input video given. Usage: beatgif <VIDEO>, where VIDEO is named <mapId>_<label>.<ext>";

fn main() {
    let cli = Cli::parse();
    process::exit(run(cli.input.as_deref()));
}

fn run(input: Option<&Path>) -> i32 {
    let (config, logging) = match load_config(None) {
        Ok(loaded) => loaded,
        Err(e) => {
            terminal::print_error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    if let Err(e) = setup_logging(&logging) {
        let e = CoreError::Logging(format!("{e:#}"));
        terminal::print_error(&e.to_string());
        return EXIT_FAILURE;
    }
    terminal::register_cli_reporter();

    let Some(input) = input else {
        log::warn!("{USAGE_HINT}");
        terminal::print_warning(USAGE_HINT);
        return EXIT_SUCCESS;
    };
    log::info!("Received file path: {}", input.display());

    match run_convert(&config, input) {
        Ok(report) if report.succeeded() => EXIT_SUCCESS,
        Ok(_) => EXIT_FAILURE,
        Err(e) => {
            log::error!("Aborted {}: {e}", input.display());
            terminal::print_error(&e.to_string());
            EXIT_FAILURE
        }
    }
}
