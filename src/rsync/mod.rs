//! # Sync-tool comparison
//!
//! Delegates the comparison to `rsync` running in dry-run mode and turns its
//! itemized change listing into difference entries. Nothing is ever copied
//! or deleted: the tool only reports what it *would* do to make the backup
//! match the source.
//!
//! ## Process handling
//!
//! Standard output is read line by line while the tool runs so progress can
//! be shown. Standard error is drained only after standard output reaches
//! end of stream, then the process is reaped. Classification starts once the
//! full listing and the exit code are known. There is no timeout: a hung
//! tool blocks the run.

use crate::entry::DifferenceEntry;
use crate::error::DiffError;
use crate::observer::Observer;
use crate::roots::ComparisonRoot;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use tracing::{Level, debug, info, span, warn};

/// Exit code interpretation
pub mod exit_code;
/// Output line classification
pub mod parser;

/// Number of stderr lines quoted in a failure message
const STDERR_CONTEXT_LINES: usize = 3;

/// A fully resolved dry-run command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsyncInvocation {
    /// Program name or path
    program: String,
    /// `--rsh=...` argument when an SSH key is used
    rsh: Option<String>,
    /// Source argument with trailing separator
    source: String,
    /// Backup argument with trailing separator
    backup: String,
}

impl RsyncInvocation {
    /// Prepare a dry-run comparison of `source` against `backup`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ssh_key` is given but is not an existing file
    /// - a root names a user without a host
    pub fn new(
        program: &str,
        ssh_program: &str,
        source: &ComparisonRoot,
        backup: &ComparisonRoot,
        ssh_key: Option<&Path>,
    ) -> Result<Self> {
        let rsh = match ssh_key {
            Some(key) if !key.is_file() => {
                return Err(DiffError::subprocess(
                    program,
                    format!("SSH key does not exist: {}", key.display()),
                )
                .into());
            }
            Some(key) => Some(format!("--rsh={ssh_program} -i {}", key.display())),
            None => None,
        };

        Ok(Self {
            program: program.to_string(),
            rsh,
            source: source.rsync_argument()?,
            backup: backup.rsync_argument()?,
        })
    }

    /// Program to run
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program, in order
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["--dry-run".to_string(), "--itemize-changes".to_string()];
        if let Some(rsh) = &self.rsh {
            args.push(rsh.clone());
        }
        args.push("--archive".to_string());
        args.push("--delete".to_string());
        args.push(self.source.clone());
        args.push(self.backup.clone());
        args
    }
}

/// Everything captured from one run of the tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsyncOutput {
    /// Trimmed stdout lines
    pub stdout: Vec<String>,
    /// Non-empty trimmed stderr lines
    pub stderr: Vec<String>,
    /// Process exit code
    pub exit_code: i32,
}

/// Run the tool and capture its output
///
/// # Errors
///
/// Returns [`DiffError::Subprocess`] if:
/// - the program cannot be found or started
/// - it exits with a code outside [`exit_code::ACCEPTED_EXIT_CODES`]
/// - it is terminated by a signal
pub fn run(invocation: &RsyncInvocation, observer: &mut dyn Observer) -> Result<RsyncOutput> {
    let span = span!(Level::DEBUG, "rsync", program = invocation.program());
    let _guard = span.enter();

    let program = resolve_program(invocation.program())?;
    let args = invocation.args();

    info!("Executing rsync");
    debug!(program = %program.display(), args = ?args, "Spawning rsync");

    let mut child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| {
            DiffError::subprocess(invocation.program(), format!("Failed to start: {err}"))
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let mut output = RsyncOutput::default();

    if let Err(err) = capture(stdout, stderr, &mut output, observer) {
        abandon(&mut child);
        return Err(err);
    }

    let status = child.wait().context("Failed to wait for rsync")?;
    info!("Rsync has finished executing");

    let Some(code) = status.code() else {
        return Err(DiffError::subprocess(
            invocation.program(),
            format!("Terminated by a signal{}", stderr_suffix(&output.stderr)),
        )
        .into());
    };
    output.exit_code = code;

    if !exit_code::is_accepted(code) {
        return Err(DiffError::subprocess(
            invocation.program(),
            format!(
                "Failed to execute rsync; Exited with code {code} ({}){}",
                exit_code::describe(code),
                stderr_suffix(&output.stderr)
            ),
        )
        .into());
    }

    for line in &output.stderr {
        warn!(line = %line, "rsync reported");
    }

    Ok(output)
}

/// Run the tool and classify its listing
///
/// # Errors
///
/// Returns an error if the tool cannot be run or exits with an unaccepted code.
pub fn compare_with_rsync(
    invocation: &RsyncInvocation,
    observer: &mut dyn Observer,
) -> Result<Vec<DifferenceEntry>> {
    let output = run(invocation, observer)?;

    info!("Calculating difference entries");
    let entries = parser::parse_output(output.stdout.iter().map(String::as_str));
    info!(count = entries.len(), "Finished calculating difference entries");

    Ok(entries)
}

/// Read stdout line by line until end of stream, then drain stderr
fn capture(
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    output: &mut RsyncOutput,
    observer: &mut dyn Observer,
) -> Result<()> {
    let stdout = stdout.context("Failed to capture rsync stdout")?;
    let mut stderr = stderr.context("Failed to capture rsync stderr")?;

    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read rsync output")?;
        if read == 0 {
            break;
        }
        output
            .stdout
            .push(String::from_utf8_lossy(&buf).trim().to_string());
        observer.lines_captured(output.stdout.len());
    }
    observer.phase_finished();

    let mut err_bytes = Vec::new();
    stderr
        .read_to_end(&mut err_bytes)
        .context("Failed to read rsync error output")?;
    output.stderr = String::from_utf8_lossy(&err_bytes)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    Ok(())
}

/// Kill and reap a child whose output could not be read
fn abandon(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(error = %err, "Failed to kill rsync");
    }
    if let Err(err) = child.wait() {
        warn!(error = %err, "Failed to reap rsync");
    }
}

/// Find `program` on `PATH`
fn resolve_program(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|err| {
        DiffError::subprocess(program, format!("Could not locate program: {err}")).into()
    })
}

/// The first few stderr lines, formatted for an error message
fn stderr_suffix(stderr: &[String]) -> String {
    if stderr.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = stderr
        .iter()
        .take(STDERR_CONTEXT_LINES)
        .map(String::as_str)
        .collect();
    format!(": {}", lines.join(" | "))
}
