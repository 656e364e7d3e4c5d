//! Redundancy reduction.
//!
//! A directory missing from one side implies that everything below it is
//! missing too, so those deeper entries are dropped and only the shallowest
//! missing directory is kept.
//!
//! Containment is a plain string-prefix test on the relative path, not a
//! path-component test: a missing `logs` directory also swallows an entry
//! for `logs2/app.log`.

use crate::entry::DifferenceEntry;
use crate::observer::Observer;
use tracing::{Level, debug, span};

/// Drop every entry implied by a shallower missing directory
///
/// Repeatedly picks the missing directory with the shortest path (first one
/// wins on ties) from the entries still alive, keeps it, and removes every
/// other entry whose path starts with it. Stops when no missing directory is
/// left to pick. Surviving entries keep their original order.
pub fn reduce(entries: Vec<DifferenceEntry>, observer: &mut dyn Observer) -> Vec<DifferenceEntry> {
    let span = span!(Level::DEBUG, "reduce", total = entries.len());
    let _guard = span.enter();

    let mut removed = vec![false; entries.len()];
    let mut pool: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.is_missing() && entry.is_dir())
        .map(|(idx, _)| idx)
        .collect();

    let mut iteration = 0;
    let mut remaining = entries.len();
    loop {
        iteration += 1;

        let shallowest = pool
            .iter()
            .enumerate()
            .filter(|&(_, &idx)| !removed[idx])
            .min_by_key(|&(_, &idx)| entries[idx].item().len())
            .map(|(pos, &idx)| (pos, idx));

        let Some((pos, root_idx)) = shallowest else {
            break;
        };
        pool.remove(pos);

        let root = entries[root_idx].item();
        for (idx, entry) in entries.iter().enumerate() {
            if idx == root_idx || removed[idx] {
                continue;
            }
            let item = entry.item();
            if item.len() >= root.len() && item.starts_with(root) {
                removed[idx] = true;
                remaining -= 1;
            }
        }

        observer.reduction_step(iteration, remaining);
    }
    observer.phase_finished();

    debug!(iterations = iteration, remaining, "Cleaned difference entries");

    entries
        .into_iter()
        .zip(removed)
        .filter_map(|(entry, gone)| (!gone).then_some(entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DifferenceKind, ItemType};
    use crate::observer::Silent;

    fn items(entries: &[DifferenceEntry]) -> Vec<&str> {
        entries.iter().map(DifferenceEntry::item).collect()
    }

    #[test]
    fn test_collapses_under_shallowest_missing_dir() {
        let entries = vec![
            DifferenceEntry::missing_from_backup("a/b/c.txt", ItemType::File),
            DifferenceEntry::missing_from_backup("a", ItemType::Directory),
            DifferenceEntry::missing_from_backup("a/b", ItemType::Directory),
        ];
        let reduced = reduce(entries, &mut Silent);
        assert_eq!(items(&reduced), ["a"]);
    }

    #[test]
    fn test_missing_file_does_not_swallow() {
        let entries = vec![
            DifferenceEntry::missing_from_source("notes", ItemType::File),
            DifferenceEntry::missing_from_source("notes/deeper", ItemType::File),
        ];
        let reduced = reduce(entries.clone(), &mut Silent);
        assert_eq!(reduced, entries);
    }

    #[test]
    fn test_swallows_other_kinds_below_root() {
        let entries = vec![
            DifferenceEntry::missing_from_source("old", ItemType::Directory),
            DifferenceEntry::new(
                "old/file",
                ItemType::File,
                DifferenceKind::DifferentSize { sizes: None },
            ),
            DifferenceEntry::missing_from_backup("new", ItemType::Directory),
        ];
        let reduced = reduce(entries, &mut Silent);
        assert_eq!(items(&reduced), ["old", "new"]);
    }

    #[test]
    fn test_prefix_match_is_by_string() {
        let entries = vec![
            DifferenceEntry::missing_from_backup("logs", ItemType::Directory),
            DifferenceEntry::missing_from_backup("logs2/app.log", ItemType::File),
        ];
        let reduced = reduce(entries, &mut Silent);
        assert_eq!(items(&reduced), ["logs"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(reduce(Vec::new(), &mut Silent).is_empty());
    }
}
