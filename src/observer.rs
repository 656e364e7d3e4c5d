//! Progress side channel for long scans.
//!
//! The engine calls these hooks after each unit of work and never reads
//! anything back, so comparison results do not depend on the observer.

/// Which half of the direct comparison is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonPass {
    /// Every item found in the source
    SourceToBackup,
    /// Items found only in the backup
    BackupToSource,
}

/// Receives progress notifications from the engine. All hooks default to
/// doing nothing.
pub trait Observer {
    /// `count` paths have been collected under `root` so far
    fn paths_scanned(&mut self, _root: &str, _count: usize) {}

    /// `done` of `total` items have been compared in `pass`
    fn items_compared(&mut self, _pass: ComparisonPass, _done: usize, _total: usize) {}

    /// `count` lines have been read from the sync tool
    fn lines_captured(&mut self, _count: usize) {}

    /// Reduction finished `iteration` rounds with `remaining` entries left
    fn reduction_step(&mut self, _iteration: usize, _remaining: usize) {}

    /// A phase is complete; flush any in-place display
    fn phase_finished(&mut self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Observer for Silent {}
