//! Terminal output: status messages, colors and progress display.
//!
//! Status messages go to stderr so the report on stdout stays clean enough
//! to redirect into a file.

/// Observer that draws engine progress
mod observer;
/// Redrawn progress lines
mod progress;

use crate::utils::formatters::current_time_label;
use colored::Colorize;
use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

pub use observer::TerminalObserver;
pub use progress::{Counter, Progress};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only warnings, errors and the report itself.
    Quiet = 0,
    /// Phase messages and progress.
    Normal = 1,
    /// Extra detail about each phase.
    Verbose = 2,
}

impl Verbosity {
    /// Maps the `-q`/`-v` flags to a level; quiet wins over verbose.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose > 0 {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Turns ANSI colors on or off for everything printed afterwards.
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}

/// Prints a phase message prefixed with the wall-clock time, like
/// `Oct-17-2026 09:41AM: Scanning source`.
pub fn phase(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{} {}", format!("{}:", current_time_label()).dimmed(), message);
}

/// Prints a verbose debug message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Log level used when `RUST_LOG` is not set
#[must_use]
pub const fn default_log_level(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    }
}

/// Installs the global `tracing` subscriber. Engine logs go to stderr and
/// `RUST_LOG` overrides the level picked from the verbosity flags.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(quiet, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_timer(ChronoLocal::new("[%b-%d-%Y %I:%M%p]".to_string()))
        .with_target(false)
        .try_init()
}
