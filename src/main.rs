use anyhow::Result;
use backup_diff::cli::Cli;
use backup_diff::compare::compute_differences;
use backup_diff::config::Config;
use backup_diff::error::DiffError;
use backup_diff::output::{self, TerminalObserver, Verbosity};
use backup_diff::report::Report;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io::{self, IsTerminal};
use std::process;
use std::time::Instant;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<DiffError>() {
            Some(kind) => eprintln!(
                "{} {} ({})",
                "Error:".red().bold(),
                e,
                kind.kind_label()
            ),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        process::exit(1);
    }
}

/// Parse flags, compare and print the report
fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    if let Err(err) = output::init_logging(cli.verbose, cli.quiet) {
        eprintln!("{} {err}", "Logging disabled:".yellow());
    }
    output::set_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose));

    let config = Config::load_or_default(cli.config.as_deref())?;
    output::set_color(cli.color_enabled(&config) && io::stdout().is_terminal());

    let settings = cli.settings(&config)?;
    output::phase(&format!("Comparing {} against {}", settings.source, settings.backup));

    let started = Instant::now();
    let mut observer = TerminalObserver::new();
    let entries = compute_differences(&settings, &mut observer)?;
    output::verbose(&format!(
        "Found {} difference entries in {}",
        entries.len(),
        humantime::format_duration(started.elapsed())
    ));

    let report = Report::new(
        settings.source.to_string(),
        settings.backup.to_string(),
        entries,
    );
    report.render(&mut io::stdout().lock())?;

    Ok(())
}

/// Write completions for `g` to stdout
fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
