use crate::error::DiffError;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Strips `root` from the front of `path` and returns the remainder as a
/// `/`-separated string. The root itself maps to the empty string.
///
/// # Errors
///
/// Returns [`DiffError::PathConsistency`] if `path` does not start with `root`.
pub fn strip_root(root: &Path, path: &Path) -> Result<String> {
    let stripped = path
        .strip_prefix(root)
        .map_err(|_| DiffError::PathConsistency {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
        })?;

    let parts: Vec<String> = stripped
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(parts.join("/"))
}

/// Resolves a root-relative item back onto `root`
#[must_use]
pub fn join_relative(root: &Path, item: &str) -> PathBuf {
    if item.is_empty() {
        return root.to_path_buf();
    }
    item.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Makes `path` absolute against the current directory without touching
/// symbolic links
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
