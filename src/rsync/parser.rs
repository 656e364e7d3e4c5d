//! Classification of `rsync --itemize-changes` output.
//!
//! Two line shapes carry information:
//!
//! ```text
//! <f.st...... notes/todo.txt      itemized change: 11 flag characters, then the item
//! *deleting   old/cache/          message: '*' keyword, then the item
//! ```
//!
//! The itemized matcher is tried first. Lines matching neither are logged and
//! dropped.

use crate::entry::{AttributeReason, DifferenceEntry, DifferenceKind, ItemType};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// 11 flag characters, then the item
static ITEMIZED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<flags>\S{11})(?P<item>.*)$").expect("valid regex"));

/// `*keyword`, then the item
static MESSAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*(?P<keyword>\w+)(?P<item>.*)$").expect("valid regex"));

/// Keyword rsync uses for items it would remove from the destination
const DELETING_KEYWORD: &str = "deleting";

/// An itemized change line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemizedLine<'a> {
    /// First flag: `<` `>` `c` `h` `.` or `*`
    pub change_type: char,
    /// Second flag: `d`, `f`, `L`, ...
    pub item_type: char,
    /// The remaining nine flag characters
    pub attributes: &'a str,
    /// Item path as printed
    pub item: &'a str,
}

impl<'a> ItemizedLine<'a> {
    /// Match a trimmed line against the fixed-width flag block
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = ITEMIZED_LINE.captures(line)?;
        let flags = caps.name("flags")?.as_str();
        let item = caps.name("item")?.as_str().trim();

        let mut chars = flags.char_indices();
        let (_, change_type) = chars.next()?;
        let (_, item_type) = chars.next()?;
        let rest = chars.next().map_or(flags.len(), |(idx, _)| idx);

        Some(Self {
            change_type,
            item_type,
            attributes: &flags[rest..],
            item,
        })
    }

    /// First differing attribute in the fixed precedence order
    ///
    /// checksum, size, time, permissions, owner, group, ACL, extended
    /// attributes. Size maps to its own kind rather than an attribute reason.
    /// Other letters (`T`, `u`, `n`, `b`) do not count; the change type
    /// decides those lines.
    fn attribute_kind(&self) -> Option<DifferenceKind> {
        let has = |flag: char| self.attributes.contains(flag);

        let reason = if has('c') {
            AttributeReason::Checksum
        } else if has('s') {
            return Some(DifferenceKind::DifferentSize { sizes: None });
        } else if has('t') {
            AttributeReason::ModificationTime
        } else if has('p') {
            AttributeReason::Permissions
        } else if has('o') {
            AttributeReason::Owner
        } else if has('g') {
            AttributeReason::Group
        } else if has('a') {
            AttributeReason::Acl
        } else if has('x') {
            AttributeReason::ExtendedAttributes
        } else {
            return None;
        };
        Some(DifferenceKind::DifferentAttribute(reason))
    }

    /// Map the item-type flag onto [`ItemType`]
    fn entry_item_type(&self) -> ItemType {
        match self.item_type {
            'd' => ItemType::Directory,
            'f' => ItemType::File,
            _ => ItemType::Unknown,
        }
    }

    /// Turn the line into an entry, or `None` if the change type carries no
    /// difference we track
    #[must_use]
    pub fn to_entry(&self) -> Option<DifferenceEntry> {
        let item = normalize_item(self.item);
        let item_type = self.entry_item_type();

        if let Some(kind) = self.attribute_kind() {
            return Some(DifferenceEntry::new(item, item_type, kind));
        }

        match self.change_type {
            '<' | '>' | 'c' => Some(DifferenceEntry::missing_from_backup(item, item_type)),
            'h' => Some(DifferenceEntry::unknown(
                item,
                item_type,
                "Rsync says this is a hard link",
            )),
            '.' => Some(DifferenceEntry::unknown(
                item,
                item_type,
                "Rsync says no change, but could be changing attributes",
            )),
            _ => None,
        }
    }
}

/// A `*keyword item` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine<'a> {
    /// Word after the `*`, such as `deleting`
    pub keyword: &'a str,
    /// Item path as printed
    pub item: &'a str,
}

impl<'a> MessageLine<'a> {
    /// Match a trimmed line against `*keyword item`
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = MESSAGE_LINE.captures(line)?;
        Some(Self {
            keyword: caps.name("keyword")?.as_str(),
            item: caps.name("item")?.as_str().trim(),
        })
    }

    /// `deleting` means missing from the source; any other keyword is unknown
    #[must_use]
    pub fn to_entry(&self) -> DifferenceEntry {
        let item = normalize_item(self.item);

        if self.keyword == DELETING_KEYWORD {
            let item_type = ItemType::from_is_dir(self.item.ends_with('/'));
            return DifferenceEntry::missing_from_source(item, item_type);
        }

        warn!(keyword = self.keyword, item = %item, "Unhandled rsync message");
        DifferenceEntry::unknown(
            item,
            ItemType::Unknown,
            format!("Unhandled message: {}", self.keyword),
        )
    }
}

/// Result of classifying one output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A difference to report
    Entry(DifferenceEntry),
    /// Recognized shape, but nothing to report
    Ignored,
    /// Matched neither line shape
    Unparsed,
}

/// Classify a single line of tool output
#[must_use]
pub fn classify_line(line: &str) -> LineOutcome {
    let line = line.trim();

    if let Some(itemized) = ItemizedLine::parse(line) {
        return itemized
            .to_entry()
            .map_or(LineOutcome::Ignored, LineOutcome::Entry);
    }

    if let Some(message) = MessageLine::parse(line) {
        return LineOutcome::Entry(message.to_entry());
    }

    LineOutcome::Unparsed
}

/// Classify every line of captured output into difference entries
pub fn parse_output<'a, I>(lines: I) -> Vec<DifferenceEntry>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries = Vec::new();

    for line in lines {
        match classify_line(line) {
            LineOutcome::Entry(entry) => entries.push(entry),
            LineOutcome::Ignored => debug!(line, "No difference in itemized line"),
            LineOutcome::Unparsed => debug!(line, "Don't know how to parse this line"),
        }
    }

    entries
}

/// Drop the trailing separator rsync puts on directories; `./` is the root
fn normalize_item(item: &str) -> String {
    let trimmed = item.trim_end_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_string()
    }
}
