//! sumdedup - SHA-256 duplicate file finder
//!
//! Entry point for the sumdedup CLI application.

use clap::Parser;
use sumdedup::{
    cli::Cli,
    config::Config,
    error::{ExitCode, StructuredError},
    logging,
};

fn main() {
    let mut cli = Cli::parse();
    let json_errors = cli.json_errors;

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
    }

    Config::load().apply_to(&mut cli);

    match sumdedup::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                match serde_json::to_string_pretty(&structured) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err),
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
