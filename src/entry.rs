//! The difference entry model shared by both comparison strategies.
//!
//! Each discrepancy is classified exactly once, at construction, into a
//! [`DifferenceKind`] that carries only the data that kind needs. Entries are
//! never mutated afterwards; the reducer only drops whole entries.

use crate::utils::formatters::format_timespan;
use std::fmt;

/// Whether an entry concerns a directory, a file, or an item whose type was
/// never determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// Item is a directory
    Directory,
    /// Item is anything other than a directory
    File,
    /// Type could not be determined (dangling link, type mismatch, ...)
    Unknown,
}

impl ItemType {
    /// Map a "is this a directory" answer onto the tri-state
    #[must_use]
    pub const fn from_is_dir(is_dir: bool) -> Self {
        if is_dir { Self::Directory } else { Self::File }
    }
}

/// Which attribute the sync tool reported as different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeReason {
    /// Content checksums differ
    Checksum,
    /// Permission bits differ
    Permissions,
    /// Owning user differs
    Owner,
    /// Owning group differs
    Group,
    /// Access control lists differ
    Acl,
    /// Extended attributes differ
    ExtendedAttributes,
    /// Modification times differ
    ModificationTime,
    /// Some attribute differs but none of the specific ones matched
    Generic,
}

impl AttributeReason {
    /// Human readable label used as the entry message
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Checksum => "Different checksums",
            Self::Permissions => "Different permissions",
            Self::Owner => "Different owners",
            Self::Group => "Different groups",
            Self::Acl => "Different ACLs",
            Self::ExtendedAttributes => "Different extended attributes",
            Self::ModificationTime => "Different modification times",
            Self::Generic => "Different attributes",
        }
    }
}

/// The closed taxonomy of discrepancies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DifferenceKind {
    /// Only the backup has the item
    MissingFromSource,
    /// Only the source has the item
    MissingFromBackup,
    /// Listed, but present on neither side (usually a dangling link)
    MissingFromBoth,
    /// A directory on one side and not on the other
    TypeMismatch {
        /// Which side holds the directory
        detail: String,
    },
    /// Source was modified later
    SourceNewer {
        /// Source mtime in whole seconds
        source_mtime: i64,
        /// Backup mtime in whole seconds
        backup_mtime: i64,
    },
    /// Backup was modified later
    BackupNewer {
        /// Source mtime in whole seconds
        source_mtime: i64,
        /// Backup mtime in whole seconds
        backup_mtime: i64,
    },
    /// Sizes are only known when the comparison was done locally
    DifferentSize {
        /// Source and backup sizes in bytes
        sizes: Option<(u64, u64)>,
    },
    /// The sync tool flagged an attribute
    DifferentAttribute(AttributeReason),
    /// Anything the classifiers could not place
    Unknown {
        /// What the classifier saw
        note: String,
    },
}

/// Report section an entry belongs to, declared in print order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Directory on one side, file on the other
    TypeMismatch,
    /// Listed but on neither side
    MissingFromBoth,
    /// Only in the backup
    MissingFromSource,
    /// Modified later in the source
    NewerInSource,
    /// Only in the source
    MissingFromBackup,
    /// Modified later in the backup
    NewerInBackup,
    /// Sizes differ
    SizeDifference,
    /// Attributes flagged by the sync tool
    DifferentAttributes,
    /// Everything else
    Unknown,
}

impl Bucket {
    /// All buckets in report order; the report iterates this
    pub const ORDER: [Self; 9] = [
        Self::TypeMismatch,
        Self::MissingFromBoth,
        Self::MissingFromSource,
        Self::NewerInSource,
        Self::MissingFromBackup,
        Self::NewerInBackup,
        Self::SizeDifference,
        Self::DifferentAttributes,
        Self::Unknown,
    ];

    /// Section heading
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "Directory/File type mismatch",
            Self::MissingFromBoth => "Items missing from both source and backup (bad link?)",
            Self::MissingFromSource => "Items missing from the source",
            Self::NewerInSource => "Items newer in the source",
            Self::MissingFromBackup => "Items missing from the backup",
            Self::NewerInBackup => "Items newer in the backup",
            Self::SizeDifference => "Items with different file sizes",
            Self::DifferentAttributes => "Items with different attributes",
            Self::Unknown => "Differences of an unknown type",
        }
    }
}

impl DifferenceKind {
    /// Section of the report this kind is listed under
    #[must_use]
    pub const fn bucket(&self) -> Bucket {
        match self {
            Self::MissingFromSource => Bucket::MissingFromSource,
            Self::MissingFromBackup => Bucket::MissingFromBackup,
            Self::MissingFromBoth => Bucket::MissingFromBoth,
            Self::TypeMismatch { .. } => Bucket::TypeMismatch,
            Self::SourceNewer { .. } => Bucket::NewerInSource,
            Self::BackupNewer { .. } => Bucket::NewerInBackup,
            Self::DifferentSize { .. } => Bucket::SizeDifference,
            Self::DifferentAttribute(_) => Bucket::DifferentAttributes,
            Self::Unknown { .. } => Bucket::Unknown,
        }
    }

    /// True for the two kinds that can swallow descendants during reduction
    #[must_use]
    pub const fn is_missing_from_one_side(&self) -> bool {
        matches!(self, Self::MissingFromSource | Self::MissingFromBackup)
    }
}

/// One discrepancy between the source and the backup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DifferenceEntry {
    item: String,
    item_type: ItemType,
    kind: DifferenceKind,
}

impl DifferenceEntry {
    /// Create an entry for `item` (a root-relative, `/`-separated path)
    pub fn new(item: impl Into<String>, item_type: ItemType, kind: DifferenceKind) -> Self {
        Self {
            item: item.into(),
            item_type,
            kind,
        }
    }

    /// Entry for an item only the backup has
    pub fn missing_from_source(item: impl Into<String>, item_type: ItemType) -> Self {
        Self::new(item, item_type, DifferenceKind::MissingFromSource)
    }

    /// Entry for an item only the source has
    pub fn missing_from_backup(item: impl Into<String>, item_type: ItemType) -> Self {
        Self::new(item, item_type, DifferenceKind::MissingFromBackup)
    }

    /// Entry the classifiers could not place, with a note saying why
    pub fn unknown(item: impl Into<String>, item_type: ItemType, note: impl Into<String>) -> Self {
        Self::new(
            item,
            item_type,
            DifferenceKind::Unknown { note: note.into() },
        )
    }

    /// Root-relative path; empty for the root itself
    #[must_use]
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Directory, file, or undetermined
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// The classified discrepancy
    #[must_use]
    pub const fn kind(&self) -> &DifferenceKind {
        &self.kind
    }

    /// True for directories
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.item_type, ItemType::Directory)
    }

    /// True for files
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.item_type, ItemType::File)
    }

    /// Missing from exactly one side
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.kind.is_missing_from_one_side()
    }

    /// Human readable detail, if this kind has any
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.kind {
            DifferenceKind::MissingFromSource | DifferenceKind::MissingFromBackup => None,
            DifferenceKind::MissingFromBoth => {
                Some("Item isn't in source or backup (bad link?)".to_string())
            }
            DifferenceKind::TypeMismatch { detail } => Some(detail.clone()),
            DifferenceKind::SourceNewer {
                source_mtime,
                backup_mtime,
            } => Some(format!(
                "Item has been modified more recently in source ({source_mtime}) than in backup ({backup_mtime}); Difference is {}",
                format_timespan(source_mtime.abs_diff(*backup_mtime))
            )),
            DifferenceKind::BackupNewer {
                source_mtime,
                backup_mtime,
            } => Some(format!(
                "Item has been modified more recently in backup ({backup_mtime}) than in source ({source_mtime}); Difference is {}",
                format_timespan(source_mtime.abs_diff(*backup_mtime))
            )),
            DifferenceKind::DifferentSize { sizes } => sizes.map(|(source, backup)| {
                format!("Source has a file size of {source}, but backup has a file size of {backup}")
            }),
            DifferenceKind::DifferentAttribute(reason) => Some(reason.label().to_string()),
            DifferenceKind::Unknown { note } => Some(note.clone()),
        }
    }
}

impl fmt::Display for DifferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_type {
            ItemType::Directory => write!(f, "Directory: ")?,
            ItemType::File => write!(f, "File: ")?,
            ItemType::Unknown => {}
        }

        if self.item.is_empty() {
            write!(f, ".")?;
        } else {
            write!(f, "{}", self.item)?;
        }

        if let Some(message) = self.message() {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_message_carries_both_sizes() {
        let entry = DifferenceEntry::new(
            "notes.txt",
            ItemType::File,
            DifferenceKind::DifferentSize {
                sizes: Some((120, 118)),
            },
        );
        assert_eq!(
            entry.message().as_deref(),
            Some("Source has a file size of 120, but backup has a file size of 118")
        );
    }

    #[test]
    fn test_size_flag_without_sizes_has_no_message() {
        let entry = DifferenceEntry::new(
            "notes.txt",
            ItemType::File,
            DifferenceKind::DifferentSize { sizes: None },
        );
        assert_eq!(entry.message(), None);
        assert_eq!(entry.kind().bucket(), Bucket::SizeDifference);
    }

    #[test]
    fn test_source_newer_message() {
        let entry = DifferenceEntry::new(
            "a.txt",
            ItemType::File,
            DifferenceKind::SourceNewer {
                source_mtime: 1_700_000_100,
                backup_mtime: 1_700_000_000,
            },
        );
        let message = entry.message().unwrap();
        assert!(message.contains("(1700000100)"));
        assert!(message.contains("(1700000000)"));
        assert!(message.ends_with("Difference is 1m 40s"));
    }

    #[test]
    fn test_display_line() {
        let dir = DifferenceEntry::missing_from_backup("photos", ItemType::Directory);
        assert_eq!(dir.to_string(), "Directory: photos");

        let both = DifferenceEntry::new("link", ItemType::Unknown, DifferenceKind::MissingFromBoth);
        assert_eq!(
            both.to_string(),
            "link (Item isn't in source or backup (bad link?))"
        );

        let root = DifferenceEntry::new(
            "",
            ItemType::Directory,
            DifferenceKind::BackupNewer {
                source_mtime: 0,
                backup_mtime: 1,
            },
        );
        assert!(root.to_string().starts_with("Directory: . ("));
    }

    #[test]
    fn test_item_type_flags_are_exclusive() {
        for item_type in [ItemType::Directory, ItemType::File, ItemType::Unknown] {
            let entry = DifferenceEntry::missing_from_source("x", item_type);
            assert!(!(entry.is_dir() && entry.is_file()));
        }
    }
}
