use super::Config;
use crate::roots::ComparisonRoot;
use std::path::PathBuf;

/// Everything one comparison run needs, after merging command line flags
/// over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tree being backed up
    pub source: ComparisonRoot,
    /// Backup copy of the source
    pub backup: ComparisonRoot,
    /// Identity file handed to the remote shell
    pub ssh_key: Option<PathBuf>,
    /// Use the sync tool even when both roots are local
    pub force_rsync: bool,
    /// Run the reducer on the computed entries
    pub clean: bool,
    /// Descend into linked directories when walking locally
    pub follow_symlinks: bool,
    /// Sync tool to run
    pub rsync_program: String,
    /// Remote shell paired with `ssh_key`
    pub ssh_program: String,
}

impl Settings {
    /// Settings for `source` and `backup` with built-in defaults
    #[must_use]
    pub fn new(source: ComparisonRoot, backup: ComparisonRoot) -> Self {
        Self::from_config(&Config::default(), source, backup)
    }

    /// Settings for `source` and `backup` with defaults taken from `config`
    #[must_use]
    pub fn from_config(config: &Config, source: ComparisonRoot, backup: ComparisonRoot) -> Self {
        Self {
            source,
            backup,
            ssh_key: None,
            force_rsync: false,
            clean: config.report.clean,
            follow_symlinks: config.scan.follow_symlinks,
            rsync_program: config.rsync.program.clone(),
            ssh_program: config.rsync.ssh_program.clone(),
        }
    }
}
