//! Path set builder.
//!
//! Walks a comparison root and collects every directory, file and the root
//! itself as root-relative paths.

use crate::error::DiffError;
use crate::observer::Observer;
use crate::utils::paths::strip_root;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{Level, debug, span, warn};
use walkdir::WalkDir;

/// Relative paths found under a root. `""` is the root itself.
pub type PathSet = BTreeSet<String>;

/// Collect every item under `root` as a root-relative path
///
/// Symbolic links are listed but not descended into unless `follow_symlinks`
/// is set. Entries that cannot be read are logged and skipped.
///
/// # Errors
///
/// Returns an error if:
/// - `root` does not exist or is not a directory
/// - a walked path does not start with `root`
pub fn build_path_set(
    root: &Path,
    follow_symlinks: bool,
    observer: &mut dyn Observer,
) -> Result<PathSet> {
    let span = span!(Level::DEBUG, "build_path_set", root = %root.display());
    let _guard = span.enter();

    if !root.is_dir() {
        return Err(DiffError::configuration(format!(
            "Not a valid directory: {}",
            root.display()
        ))
        .into());
    }

    let label = root.to_string_lossy();
    let mut paths = PathSet::new();

    for entry in WalkDir::new(root).follow_links(follow_symlinks) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };

        paths.insert(strip_root(root, entry.path())?);
        observer.paths_scanned(&label, paths.len());
    }
    observer.phase_finished();

    debug!(count = paths.len(), "Consumed path items");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Silent;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_structure(root: &Path) -> Result<()> {
        // root/
        //   docs/
        //     notes/
        //       todo.txt
        //   music/
        //   readme.md
        fs::create_dir_all(root.join("docs/notes"))?;
        fs::create_dir_all(root.join("music"))?;
        fs::write(root.join("docs/notes/todo.txt"), "milk")?;
        fs::write(root.join("readme.md"), "# hi")?;
        Ok(())
    }

    #[test]
    fn test_includes_root_dirs_and_files() -> Result<()> {
        let temp = TempDir::new()?;
        create_test_structure(temp.path())?;

        let paths = build_path_set(temp.path(), false, &mut Silent)?;
        let expected: PathSet = [
            "",
            "docs",
            "docs/notes",
            "docs/notes/todo.txt",
            "music",
            "readme.md",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(paths, expected);
        Ok(())
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let err = build_path_set(&temp.path().join("nope"), false, &mut Silent).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiffError>(),
            Some(DiffError::Configuration(_))
        ));
    }

    #[test]
    fn test_file_root_is_rejected() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join("file.txt");
        fs::write(&file, "x")?;
        assert!(build_path_set(&file, false, &mut Silent).is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_listed() -> Result<()> {
        let temp = TempDir::new()?;
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("dangling"))?;

        let paths = build_path_set(temp.path(), false, &mut Silent)?;
        assert!(paths.contains("dangling"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_descended_by_default() -> Result<()> {
        let temp = TempDir::new()?;
        let outside = TempDir::new()?;
        fs::write(outside.path().join("inner.txt"), "x")?;
        std::os::unix::fs::symlink(outside.path(), temp.path().join("linked"))?;

        let shallow = build_path_set(temp.path(), false, &mut Silent)?;
        assert!(shallow.contains("linked"));
        assert!(!shallow.contains("linked/inner.txt"));

        let deep = build_path_set(temp.path(), true, &mut Silent)?;
        assert!(deep.contains("linked/inner.txt"));
        Ok(())
    }
}
