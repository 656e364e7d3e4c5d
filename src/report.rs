//! Groups the final entries into sections and renders the text report.

use crate::entry::{Bucket, DifferenceEntry};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// Title printed above the report
pub const REPORT_TITLE: &str = "Backup Diff Report";

/// Printed when no differences survive
pub const NO_DIFFERENCES: &str = "Everything seems to match !";

/// Stars on each side of a section heading
const HEADING_STARS: usize = 5;

/// Entries grouped by report section, ready to print
#[derive(Debug, Clone)]
pub struct Report {
    /// Source label for the header
    source: String,
    /// Backup label for the header
    backup: String,
    /// Sorted entries per non-empty bucket
    sections: BTreeMap<Bucket, Vec<DifferenceEntry>>,
}

impl Report {
    /// Buckets and sorts `entries` for printing. `source` and `backup` are
    /// the root labels shown in the header.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        backup: impl Into<String>,
        entries: Vec<DifferenceEntry>,
    ) -> Self {
        let mut sections: BTreeMap<Bucket, Vec<DifferenceEntry>> = BTreeMap::new();
        for entry in entries {
            sections
                .entry(entry.kind().bucket())
                .or_default()
                .push(entry);
        }

        for entries in sections.values_mut() {
            entries.sort_by(|a, b| {
                b.is_dir()
                    .cmp(&a.is_dir())
                    .then_with(|| a.item().cmp(b.item()))
            });
        }

        debug!(sections = sections.len(), "Generated report");

        Self {
            source: source.into(),
            backup: backup.into(),
            sections,
        }
    }

    /// True when there is nothing to report
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total entries across all sections
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// The sorted entries of one section; empty if the section has none
    #[must_use]
    pub fn section(&self, bucket: Bucket) -> &[DifferenceEntry] {
        self.sections
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Non-empty sections in print order
    pub fn sections(&self) -> impl Iterator<Item = (Bucket, &[DifferenceEntry])> {
        Bucket::ORDER.into_iter().filter_map(|bucket| {
            self.sections
                .get(&bucket)
                .map(|entries| (bucket, entries.as_slice()))
        })
    }

    /// Writes the report to `out`
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        write_heading(out, REPORT_TITLE, true)?;
        writeln!(out, "Source: {}", self.source)?;
        writeln!(out, "Backup: {}", self.backup)?;

        for (bucket, entries) in self.sections() {
            writeln!(out)?;
            write_heading(out, bucket.label(), false)?;
            for entry in entries {
                writeln!(out, "{entry}")?;
            }
        }

        if self.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", NO_DIFFERENCES.green())?;
        }

        out.flush()
    }
}

/// `***** text *****`, with a full line of stars above it when `hooded`
fn write_heading<W: Write>(out: &mut W, text: &str, hooded: bool) -> io::Result<()> {
    let stars = "*".repeat(HEADING_STARS);
    let title = format!("{stars} {text} {stars}");

    writeln!(out)?;
    if hooded {
        writeln!(out, "{}", "*".repeat(title.len()).bold())?;
    }
    writeln!(out, "{}", title.bold())
}
