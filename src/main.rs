mod cli;
mod logging;
mod spinner;

use std::env;
use std::io;
use std::process;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use colored::*;
use dotenv::dotenv;
use spinner::CliReporter;
use terminator::report::{self, EXIT_CONFIG_ERROR};
use terminator::{ProgressReporter, ScanEngine, SilentReporter};
use tracing::info;

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse_from(cli::normalize_args(env::args_os()));

    let code = match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            EXIT_CONFIG_ERROR
        }
    };

    // process::exit skips destructors; flush the log file first.
    drop(guard);
    process::exit(code);
}

fn run(args: Cli) -> anyhow::Result<i32> {
    let config = terminator::config::load_configuration(args.config.as_deref())
        .context("Error loading configuration")?
        .with_overrides(args.overrides());

    if args.print_config {
        print!(
            "{}",
            toml::to_string(&config).context("Error serializing configuration")?
        );
        return Ok(report::EXIT_CLEAN);
    }

    config.validate().context("Invalid scan directory")?;

    let quiet = config.quiet;
    let reporter: Box<dyn ProgressReporter> = if config.progress && !quiet {
        Box::new(CliReporter::new())
    } else {
        Box::new(SilentReporter)
    };

    let engine = ScanEngine::new(config);
    let result = engine
        .scan(reporter.as_ref())
        .context("Error resolving ignore patterns")?;

    info!(
        "{} files checked in {} ({} paths ignored), {} unterminated, {} check errors",
        format!("{}", result.stats.files_checked).green(),
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        result.ignored_paths,
        format!("{}", result.unterminated.len()).red(),
        format!("{}", result.failures.len()).red(),
    );

    let code = report::report(&result, quiet, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("Error writing report")?;
    Ok(code)
}
