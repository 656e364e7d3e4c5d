//! Direct comparison from local filesystem metadata.

use crate::entry::{DifferenceEntry, DifferenceKind, ItemType};
use crate::observer::{ComparisonPass, Observer};
use crate::scanner::build_path_set;
use crate::utils::paths::join_relative;
use anyhow::{Context, Result};
use filetime::FileTime;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{Level, debug, info, span};

/// What one side knows about an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideState {
    /// Directory after following links
    pub is_dir: bool,
    /// Length in bytes
    pub size: u64,
    /// Modification time in whole seconds since the epoch
    pub mtime: i64,
}

impl SideState {
    /// Stat `path`, following symbolic links. An item that is not there
    /// (including a link whose target is gone) yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the item being absent.
    pub fn probe(path: &Path) -> Result<Option<Self>> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Some(Self {
                is_dir: meta.is_dir(),
                size: meta.len(),
                mtime: FileTime::from_last_modification_time(&meta).unix_seconds(),
            })),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read metadata: {}", path.display()))
            }
        }
    }
}

/// Classify a single item from the state of both sides. Returns `None` when
/// the item looks identical.
#[must_use]
pub fn classify(
    item: &str,
    source: Option<SideState>,
    backup: Option<SideState>,
) -> Option<DifferenceEntry> {
    let (source, backup) = match (source, backup) {
        (Some(source), None) => {
            return Some(DifferenceEntry::missing_from_backup(
                item,
                ItemType::from_is_dir(source.is_dir),
            ));
        }
        (None, Some(backup)) => {
            return Some(DifferenceEntry::missing_from_source(
                item,
                ItemType::from_is_dir(backup.is_dir),
            ));
        }
        (None, None) => {
            return Some(DifferenceEntry::new(
                item,
                ItemType::Unknown,
                DifferenceKind::MissingFromBoth,
            ));
        }
        (Some(source), Some(backup)) => (source, backup),
    };

    if source.is_dir != backup.is_dir {
        let detail = if source.is_dir {
            "Source is a directory, but backup is a file"
        } else {
            "Source is a file, but backup is a directory"
        };
        return Some(DifferenceEntry::new(
            item,
            ItemType::Unknown,
            DifferenceKind::TypeMismatch {
                detail: detail.to_string(),
            },
        ));
    }

    let item_type = ItemType::from_is_dir(source.is_dir);
    let kind = if !source.is_dir && source.size != backup.size {
        DifferenceKind::DifferentSize {
            sizes: Some((source.size, backup.size)),
        }
    } else if source.mtime > backup.mtime {
        DifferenceKind::SourceNewer {
            source_mtime: source.mtime,
            backup_mtime: backup.mtime,
        }
    } else if backup.mtime > source.mtime {
        DifferenceKind::BackupNewer {
            source_mtime: source.mtime,
            backup_mtime: backup.mtime,
        }
    } else {
        return None;
    };

    Some(DifferenceEntry::new(item, item_type, kind))
}

/// Compare one root-relative item across both roots
///
/// # Errors
///
/// Returns an error if either side's metadata cannot be read for a reason
/// other than the item being absent.
pub fn compare_item(
    source_root: &Path,
    backup_root: &Path,
    item: &str,
) -> Result<Option<DifferenceEntry>> {
    let source = SideState::probe(&join_relative(source_root, item))?;
    let backup = SideState::probe(&join_relative(backup_root, item))?;
    Ok(classify(item, source, backup))
}

/// Walk both roots and compare every item found in either of them
///
/// Items from the source are compared first, then the items that exist only
/// in the backup; nothing is visited twice.
///
/// # Errors
///
/// Returns an error if:
/// - either root is not a readable directory
/// - metadata lookup fails for a reason other than absence
pub fn compare_directly(
    source_root: &Path,
    backup_root: &Path,
    follow_symlinks: bool,
    observer: &mut dyn Observer,
) -> Result<Vec<DifferenceEntry>> {
    let span = span!(Level::DEBUG, "compare_directly");
    let _guard = span.enter();

    info!(path = %source_root.display(), "Consuming source path");
    let source_items = build_path_set(source_root, follow_symlinks, observer)?;
    info!(count = source_items.len(), "Done consuming source path items");

    info!(path = %backup_root.display(), "Consuming backup path");
    let backup_items = build_path_set(backup_root, follow_symlinks, observer)?;
    info!(count = backup_items.len(), "Done consuming backup path items");

    let mut entries = Vec::new();

    let total = source_items.len();
    for (i, item) in source_items.iter().enumerate() {
        if let Some(entry) = compare_item(source_root, backup_root, item)? {
            entries.push(entry);
        }
        observer.items_compared(ComparisonPass::SourceToBackup, i + 1, total);
    }
    observer.phase_finished();

    let backup_only: Vec<&String> = backup_items.difference(&source_items).collect();
    let total = backup_only.len();
    for (i, item) in backup_only.into_iter().enumerate() {
        if let Some(entry) = compare_item(source_root, backup_root, item)? {
            entries.push(entry);
        }
        observer.items_compared(ComparisonPass::BackupToSource, i + 1, total);
    }
    observer.phase_finished();

    debug!(count = entries.len(), "Direct comparison finished");
    Ok(entries)
}
