//! Configuration file handling.
//!
//! The file is optional. When present it supplies defaults that command
//! line flags override:
//!
//! ```toml
//! [scan]
//! follow_symlinks = false
//!
//! [rsync]
//! program = "rsync"
//! ssh_program = "ssh"
//!
//! [report]
//! clean = true
//! color = true
//! ```

/// Merged per-run settings
pub mod settings;
/// Unknown-key detection for config files
pub mod validator;

use crate::error::DiffError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use settings::Settings;

/// Directory (under the platform config dir) holding the config file
pub const CONFIG_DIR_NAME: &str = "backup-diff";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of the config file; every section is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// `[scan]` section
    #[serde(default)]
    pub scan: ScanConfig,

    /// `[rsync]` section
    #[serde(default)]
    pub rsync: RsyncConfig,

    /// `[report]` section
    #[serde(default)]
    pub report: ReportConfig,
}

/// Direct comparison options
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Descend into symbolic links to directories during a direct comparison
    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Sync tool options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RsyncConfig {
    /// Program name or path of the sync tool
    #[serde(default = "default_rsync_program")]
    pub program: String,
    /// Remote shell used with `--ssh-key`
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
}

/// Report options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Collapse entries under their shallowest missing directory
    #[serde(default = "default_true")]
    pub clean: bool,
    /// Color the report when stdout is a terminal
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for RsyncConfig {
    fn default() -> Self {
        Self {
            program: default_rsync_program(),
            ssh_program: default_ssh_program(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            clean: true,
            color: true,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config file the user asked for, or the default one if it exists
    ///
    /// An explicitly requested file must exist; a missing default file just
    /// means built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Configuration`] if:
    /// - an explicit path does not exist
    /// - the file cannot be read or is not valid TOML for this schema
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(DiffError::configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    ))
                    .into());
                }
                Self::load(path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is invalid TOML, or holds
    /// invalid values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        validator::ConfigValidator::new().warn_unknown_fields(&content);

        Self::parse(&content).map_err(|err| {
            DiffError::configuration(format!(
                "Invalid config file {}: {err:#}",
                path.display()
            ))
            .into()
        })
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is invalid TOML or holds invalid values.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every run fail
    fn validate(&self) -> Result<()> {
        if self.rsync.program.trim().is_empty() {
            anyhow::bail!("rsync.program cannot be empty");
        }
        if self.rsync.ssh_program.trim().is_empty() {
            anyhow::bail!("rsync.ssh_program cannot be empty");
        }
        Ok(())
    }
}

/// Serde default for `rsync.program`
fn default_rsync_program() -> String {
    "rsync".to_string()
}

/// Serde default for `rsync.ssh_program`
fn default_ssh_program() -> String {
    "ssh".to_string()
}

/// Serde default for boolean switches that start on
const fn default_true() -> bool {
    true
}
