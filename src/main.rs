//! Jira command-line front end.
//!
//! Resolves the command line and the config cascade into one operation and
//! one option map, then hands both to the issue handler.

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use jira_cli::cli::Cli;
use jira_cli::config::{ConfigLocator, EnvProjector, ProcessProvider};
use jira_cli::dispatch::{ReportHandler, dispatch};
use jira_cli::logging::{self, LogTarget};
use jira_cli::pipeline::{self, Context, Request};
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let target = LogTarget::parse(&cli.log);
    if let Err(e) = logging::init(&target, cli.verbose) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Fatal errors always reach stderr, even with logging off.
            if target == LogTarget::Off {
                eprintln!("Error: {:#}", e);
            } else {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let context = Context::from_env();
    let locator = ConfigLocator::discover()?;
    debug!(paths = ?locator.paths(), "Config cascade");

    let mut resolution = pipeline::resolve(Request::from(&cli), &context, &locator, ProcessProvider)?;

    // Handlers may start subprocesses (editor, browser) that read JIRA_*.
    EnvProjector::default()
        .project(&resolution.options, Some(resolution.invocation.operation))
        .export();

    let stdout = std::io::stdout();
    let mut handler = ReportHandler::new(stdout.lock());
    dispatch(&resolution.invocation, &mut resolution.options, &mut handler)?;

    Ok(())
}
