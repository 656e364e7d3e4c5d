//! Command-line interface definitions for backup-diff.
//!
//! The definitions are shared between the main binary and xtask, which
//! renders the man page from them.

#![allow(missing_docs)]

use crate::config::{Config, Settings};
use crate::error::DiffError;
use crate::roots::{ComparisonRoot, RemoteIdentity};
use crate::utils::paths::absolutize;
use anyhow::Result;
use clap::Parser;
use clap_complete::Shell;
use std::path::{Path, PathBuf};

/// Compare a directory tree against its backup and report what differs.
#[derive(Parser, Debug)]
#[command(
    name = "backup-diff",
    version = crate::VERSION,
    about = "Report the differences between a directory and its backup",
    long_about = "Walks a source tree and its backup (or asks rsync for a dry run) and \
                  prints every missing, newer, resized or otherwise different item, \
                  collapsed under the shallowest missing directory"
)]
pub struct Cli {
    /// Source directory
    #[arg(long, value_name = "PATH")]
    pub source_path: Option<PathBuf>,

    /// Host the source lives on (implies rsync)
    #[arg(long, value_name = "HOST")]
    pub source_remote_host: Option<String>,

    /// SSH user for the source host (implies rsync)
    #[arg(long, value_name = "USER")]
    pub source_remote_user: Option<String>,

    /// Backup destination directory
    #[arg(long, value_name = "PATH")]
    pub backup_path: Option<PathBuf>,

    /// Host the backup lives on (implies rsync)
    #[arg(long, value_name = "HOST")]
    pub backup_remote_host: Option<String>,

    /// SSH user for the backup host (implies rsync)
    #[arg(long, value_name = "USER")]
    pub backup_remote_user: Option<String>,

    /// SSH identity file used to reach a remote root (implies rsync)
    #[arg(long, value_name = "FILE")]
    pub ssh_key: Option<PathBuf>,

    /// Compare with an rsync dry run even when both roots are local
    #[arg(long, visible_alias = "rsync")]
    pub use_rsync: bool,

    /// Keep entries nested under a missing directory
    #[arg(long)]
    pub no_clean: bool,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "FILE", env = "BACKUP_DIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show more detail; repeat for debug logs
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print warnings, errors and the report
    #[arg(short, long)]
    pub quiet: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Builds the run settings, with flags taking precedence over `config`
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Configuration`] if the source or backup path is
    /// missing, or an error if a local path cannot be made absolute.
    pub fn settings(&self, config: &Config) -> Result<Settings> {
        let source = root(
            self.source_path.as_deref(),
            "Please provide a source path",
            RemoteIdentity {
                host: self.source_remote_host.clone(),
                user: self.source_remote_user.clone(),
            },
        )?;
        let backup = root(
            self.backup_path.as_deref(),
            "Please provide a backup destination path",
            RemoteIdentity {
                host: self.backup_remote_host.clone(),
                user: self.backup_remote_user.clone(),
            },
        )?;

        let mut settings = Settings::from_config(config, source, backup);
        settings.ssh_key = self.ssh_key.as_deref().map(absolutize).transpose()?;
        settings.force_rsync = self.use_rsync;
        if self.no_clean {
            settings.clean = false;
        }
        Ok(settings)
    }

    /// Whether the report should be colored, given the config file's choice
    #[must_use]
    pub const fn color_enabled(&self, config: &Config) -> bool {
        !self.no_color && config.report.color
    }
}

/// Local paths are made absolute; remote paths are passed through untouched
fn root(path: Option<&Path>, missing: &str, remote: RemoteIdentity) -> Result<ComparisonRoot> {
    let path = path.ok_or_else(|| DiffError::configuration(missing))?;
    if remote.is_empty() {
        Ok(ComparisonRoot::local(absolutize(path)?))
    } else {
        Ok(ComparisonRoot::with_remote(path, remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("backup-diff").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_source_is_configuration_error() {
        let cli = parse(&["--backup-path", "/dst"]);
        let err = cli.settings(&Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiffError>(),
            Some(DiffError::Configuration(msg)) if msg == "Please provide a source path"
        ));
    }

    #[test]
    fn test_missing_backup_is_configuration_error() {
        let cli = parse(&["--source-path", "/src"]);
        let err = cli.settings(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("backup destination"));
    }

    #[test]
    fn test_flags_override_config() -> Result<()> {
        let config = Config::parse("[report]\nclean = true\ncolor = true\n")?;
        let cli = parse(&[
            "--source-path",
            "/src",
            "--backup-path",
            "/dst",
            "--rsync",
            "--no-clean",
            "--no-color",
        ]);
        let settings = cli.settings(&config)?;
        assert!(settings.force_rsync);
        assert!(!settings.clean);
        assert!(!cli.color_enabled(&config));
        Ok(())
    }

    #[test]
    fn test_config_applies_without_flags() -> Result<()> {
        let config = Config::parse("[report]\nclean = false\n[scan]\nfollow_symlinks = true\n")?;
        let cli = parse(&["--source-path", "/src", "--backup-path", "/dst"]);
        let settings = cli.settings(&config)?;
        assert!(!settings.clean);
        assert!(settings.follow_symlinks);
        assert!(!settings.force_rsync);
        Ok(())
    }

    #[test]
    fn test_remote_roots_keep_their_paths() -> Result<()> {
        let cli = parse(&[
            "--source-path",
            "relative/src",
            "--backup-path",
            "/srv/backup",
            "--backup-remote-host",
            "nas",
            "--backup-remote-user",
            "mike",
        ]);
        let settings = cli.settings(&Config::default())?;
        assert!(settings.source.path().is_absolute());
        assert!(settings.backup.is_remote());
        assert_eq!(settings.backup.rsync_argument()?, "mike@nas:/srv/backup/");
        Ok(())
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["backup-diff", "-v", "-q"]);
        assert!(result.is_err());
    }
}
