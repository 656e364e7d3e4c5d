#![allow(dead_code)]

use anyhow::Result;
use backup_diff::config::Settings;
use backup_diff::roots::ComparisonRoot;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Fixed timestamp applied to every fixture item so directory mtimes do not
/// depend on when the files inside them were written
pub const FIXTURE_MTIME: i64 = 1_700_000_000;

/// A source tree and a backup tree under one temporary directory
pub struct Trees {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub backup: PathBuf,
}

impl Trees {
    /// Create empty `source/` and `backup/` directories
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("source");
        let backup = temp_dir.path().join("backup");
        fs::create_dir(&source)?;
        fs::create_dir(&backup)?;
        Ok(Self {
            temp_dir,
            source,
            backup,
        })
    }

    /// Write the same file into both trees
    pub fn both(&self, rel: &str, content: &str) -> Result<()> {
        write_file(&self.source, rel, content)?;
        write_file(&self.backup, rel, content)?;
        Ok(())
    }

    /// Give every item in both trees the same modification time
    pub fn stamp(&self) -> Result<()> {
        stamp_tree(&self.source, FIXTURE_MTIME)?;
        stamp_tree(&self.backup, FIXTURE_MTIME)
    }

    /// Stamp only the two root directories, for trees holding items that
    /// cannot be stamped (dangling links)
    pub fn stamp_roots(&self) -> Result<()> {
        set_mtime(&self.source, FIXTURE_MTIME)?;
        set_mtime(&self.backup, FIXTURE_MTIME)
    }

    /// Settings comparing the two trees directly
    pub fn settings(&self) -> Settings {
        Settings::new(
            ComparisonRoot::local(&self.source),
            ComparisonRoot::local(&self.backup),
        )
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Write `content` to `root/rel`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Create `root/rel` and any missing parents
pub fn make_dir(root: &Path, rel: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Set the modification time of `path` to `secs` since the epoch
pub fn set_mtime(path: &Path, secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))?;
    Ok(())
}

/// Set the modification time of every item under `root`, including `root`
pub fn stamp_tree(root: &Path, secs: i64) -> Result<()> {
    for entry in WalkDir::new(root).contents_first(true) {
        set_mtime(entry?.path(), secs)?;
    }
    Ok(())
}

/// Write an executable shell script standing in for rsync. It prints
/// `stdout`, writes `stderr` to standard error and exits with `exit_code`.
#[cfg(unix)]
pub fn fake_rsync(dir: &Path, stdout: &str, stderr: &str, exit_code: i32) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\ncat <<'BACKUP_DIFF_STDOUT'\n{stdout}\nBACKUP_DIFF_STDOUT\nprintf '%s' '{stderr}' >&2\nexit {exit_code}\n"
    );
    let path = dir.join("fake-rsync");
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}
