#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)] // Counters and sizes cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # backup-diff
//!
//! Compares a source directory tree against a backup copy of it and reports
//! where the two diverge: missing items, type mismatches, newer or resized
//! files, and (through an rsync dry run) permission, owner and other
//! attribute changes.
//!
//! ## Architecture
//!
//! - [`compare`]: strategy selection and the pipeline driving everything below
//! - [`compare::direct`]: walks both trees and compares metadata locally
//! - [`rsync`]: runs `rsync --dry-run --itemize-changes` and classifies its output
//! - [`reduce`]: collapses entries under their shallowest missing directory
//! - [`report`]: buckets, sorts and prints the final entries
//! - [`entry`]: the difference taxonomy shared by all of the above
//! - [`config`]: the optional TOML config file and merged run settings
//! - [`output`]: terminal status messages and progress display
//!
//! ## Example Usage
//!
//! ```no_run
//! use backup_diff::compare::compute_differences;
//! use backup_diff::config::Settings;
//! use backup_diff::observer::Silent;
//! use backup_diff::report::Report;
//! use backup_diff::roots::ComparisonRoot;
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings::new(
//!     ComparisonRoot::local("/home/me/documents"),
//!     ComparisonRoot::local("/mnt/backup/documents"),
//! );
//! let entries = compute_differences(&settings, &mut Silent)?;
//!
//! Report::new("documents", "backup", entries).render(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Strategy selection and the comparison pipeline.
pub mod compare;

/// Configuration file parsing and run settings.
pub mod config;

/// Difference entries and their classification.
pub mod entry;

/// Fatal error types.
pub mod error;

/// Progress notifications from the engine.
pub mod observer;

/// Output formatting and progress display.
pub mod output;

/// Collapsing of redundant nested entries.
pub mod reduce;

/// Report assembly and rendering.
pub mod report;

/// Source and backup roots.
pub mod roots;

/// Comparison through an rsync dry run.
pub mod rsync;

/// Filesystem walking into relative path sets.
pub mod scanner;

/// Utility functions and helpers.
pub mod utils;

pub use entry::{DifferenceEntry, DifferenceKind, ItemType};
pub use error::DiffError;

/// Current version of the backup-diff binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
