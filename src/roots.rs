//! Comparison roots: the source tree and its backup.

use crate::error::DiffError;
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Remote login for a root reached over SSH by the sync tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteIdentity {
    /// SSH host name
    pub host: Option<String>,
    /// SSH login name
    pub user: Option<String>,
}

impl RemoteIdentity {
    /// True when neither host nor user was given
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.host.is_none() && self.user.is_none()
    }
}

/// One side of the comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRoot {
    /// Directory path, on the remote host if there is one
    path: PathBuf,
    /// Host and user; empty for local roots
    remote: RemoteIdentity,
}

impl ComparisonRoot {
    /// A root on the local filesystem
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            remote: RemoteIdentity::default(),
        }
    }

    /// A root that may live on another host
    pub fn with_remote(path: impl Into<PathBuf>, remote: RemoteIdentity) -> Self {
        Self {
            path: path.into(),
            remote,
        }
    }

    /// Directory path as given
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remote login, empty for local roots
    #[must_use]
    pub const fn remote(&self) -> &RemoteIdentity {
        &self.remote
    }

    /// True when a host or user is attached to this root
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        !self.remote.is_empty()
    }

    /// Ensures a local root exists and is a directory. Remote roots are left
    /// for the sync tool to check.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Configuration`] naming `label` when the root is
    /// missing or not a directory.
    pub fn validate_local(&self, label: &str) -> Result<()> {
        if self.is_remote() {
            return Ok(());
        }
        if !self.path.is_dir() {
            return Err(DiffError::configuration(format!(
                "{label} path isn't a valid directory: {}",
                self.path.display()
            ))
            .into());
        }
        Ok(())
    }

    /// Renders the root the way the sync tool expects it: `[user@]host:path/`
    /// or `path/`. The trailing separator makes the tool compare the
    /// directory contents rather than the directory itself.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Configuration`] if a user was given without a host.
    pub fn rsync_argument(&self) -> Result<String> {
        let path = self.path.to_string_lossy();
        let path = path.trim_end_matches('/');

        let mut argument = String::new();
        match (&self.remote.host, &self.remote.user) {
            (None, Some(user)) => {
                return Err(DiffError::configuration(format!(
                    "ssh_user provided ({user}) without ssh_host"
                ))
                .into());
            }
            (Some(host), user) => {
                if let Some(user) = user {
                    argument.push_str(user);
                    argument.push('@');
                }
                argument.push_str(host);
                argument.push(':');
                argument.push_str(path);
            }
            (None, None) => argument.push_str(path),
        }
        argument.push('/');
        Ok(argument)
    }
}

impl fmt::Display for ComparisonRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user) = &self.remote.user {
            write!(f, "{user}@")?;
        }
        if let Some(host) = &self.remote.host {
            write!(f, "{host}:")?;
        }
        write!(f, "{}", self.path.display())
    }
}
