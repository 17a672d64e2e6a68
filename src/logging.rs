//! Logging setup.
//!
//! All diagnostics go through `tracing`. The subscriber writes to stderr by
//! default so that stdout stays reserved for handler output.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Where log output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    /// Append to a file
    File(PathBuf),
}

impl LogTarget {
    /// Parse the `--log` value: `0`/`off`, `1`/`stdout`, `2`/`stderr`, or a filename.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

/// Map the `-v` count to a level: warn, then info, then debug.
pub fn verbosity_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init(target: &LogTarget, verbose: u8) -> Result<()> {
    let level = verbosity_level(verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            tracing::subscriber::set_global_default(builder.with_writer(std::io::stdout).finish())?;
        }
        LogTarget::Stderr => {
            tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing::subscriber::set_global_default(
                builder.with_writer(file).with_ansi(false).finish(),
            )?;
        }
    }
    Ok(())
}
