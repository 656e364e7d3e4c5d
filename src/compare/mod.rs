//! Strategy selection and the comparison pipeline.
//!
//! ```text
//! Settings ──> Strategy::select ──> Direct | Rsync ──> entries ──> reduce ──> report
//! ```

use crate::config::Settings;
use crate::entry::DifferenceEntry;
use crate::observer::Observer;
use crate::reduce::reduce;
use crate::rsync::{self, RsyncInvocation};
use anyhow::Result;
use tracing::info;

/// Local filesystem metadata comparison
pub mod direct;

/// How the differences are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Walk both trees locally
    Direct,
    /// Delegate to a dry run of the sync tool
    Rsync,
}

impl Strategy {
    /// Use the sync tool when forced, or whenever something about the run
    /// (a remote host or user, an SSH key) can only be honored by it
    #[must_use]
    pub fn select(settings: &Settings) -> Self {
        if settings.force_rsync
            || settings.source.is_remote()
            || settings.backup.is_remote()
            || settings.ssh_key.is_some()
        {
            Self::Rsync
        } else {
            Self::Direct
        }
    }
}

/// Compute, and unless disabled reduce, the differences between the two roots
///
/// Local roots are validated before any comparison starts.
///
/// # Errors
///
/// Returns an error if:
/// - a local root is missing or not a directory
/// - the sync tool cannot be run or fails
/// - filesystem metadata cannot be read
pub fn compute_differences(
    settings: &Settings,
    observer: &mut dyn Observer,
) -> Result<Vec<DifferenceEntry>> {
    settings.source.validate_local("Source")?;
    settings.backup.validate_local("Backup destination")?;

    let strategy = Strategy::select(settings);
    info!(?strategy, "Calculating difference entries");

    let entries = match strategy {
        Strategy::Direct => direct::compare_directly(
            settings.source.path(),
            settings.backup.path(),
            settings.follow_symlinks,
            observer,
        )?,
        Strategy::Rsync => {
            let invocation = RsyncInvocation::new(
                &settings.rsync_program,
                &settings.ssh_program,
                &settings.source,
                &settings.backup,
                settings.ssh_key.as_deref(),
            )?;
            rsync::compare_with_rsync(&invocation, observer)?
        }
    };

    if !settings.clean {
        info!("Won't clean difference entries");
        return Ok(entries);
    }

    info!(count = entries.len(), "Cleaning difference entries");
    Ok(reduce(entries, observer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roots::{ComparisonRoot, RemoteIdentity};
    use std::path::PathBuf;

    fn local_settings() -> Settings {
        Settings::new(
            ComparisonRoot::local("/src"),
            ComparisonRoot::local("/dst"),
        )
    }

    #[test]
    fn test_local_roots_compare_directly() {
        assert_eq!(Strategy::select(&local_settings()), Strategy::Direct);
    }

    #[test]
    fn test_forced_rsync() {
        let mut settings = local_settings();
        settings.force_rsync = true;
        assert_eq!(Strategy::select(&settings), Strategy::Rsync);
    }

    #[test]
    fn test_remote_or_key_selects_rsync() {
        let mut settings = local_settings();
        settings.backup = ComparisonRoot::with_remote(
            "/dst",
            RemoteIdentity {
                host: None,
                user: Some("me".into()),
            },
        );
        assert_eq!(Strategy::select(&settings), Strategy::Rsync);

        let mut settings = local_settings();
        settings.ssh_key = Some(PathBuf::from("/home/me/.ssh/id"));
        assert_eq!(Strategy::select(&settings), Strategy::Rsync);
    }
}
