//! In-place progress lines for long scans.

use colored::Colorize;
use std::fmt;
use std::io::{self, IsTerminal, Write};

/// A percentage line for work with a known total, redrawn only when the
/// whole percentage changes.
///
/// Renders like "Comparing source to backup: 42% (420/1000)".
pub struct Progress {
    /// Text before the percentage
    title: String,
    /// Item count at 100%
    total: usize,
    /// Items done so far, never above `total`
    current: usize,
    /// Whether stderr is a TTY
    is_tty: bool,
    /// Percentage last drawn
    percent: u8,
}

impl Progress {
    /// Creates a progress line; nothing is drawn unless stderr is a TTY.
    #[must_use]
    pub fn new(title: &str, total: usize) -> Self {
        Self::with_tty(title, total, io::stderr().is_terminal())
    }

    /// Construct with an explicit TTY answer
    fn with_tty(title: &str, total: usize, is_tty: bool) -> Self {
        let progress = Self {
            title: title.to_string(),
            total,
            current: 0,
            is_tty,
            percent: 0,
        };
        progress.draw("");
        progress
    }

    /// Moves the line to `current`, clamped to the total.
    pub fn update(&mut self, current: usize) {
        self.current = current.min(self.total);
        let percent = percent_of(self.current, self.total);
        if percent != self.percent {
            self.percent = percent;
            self.draw("");
        }
    }

    /// Completes the line with a "done" suffix.
    pub fn finish(mut self) {
        self.current = self.total;
        self.percent = 100;
        self.draw(", done.\n");
    }

    /// Whether anything is ever drawn
    const fn visible(&self) -> bool {
        self.is_tty && self.total > 0
    }

    /// Redraw the line followed by `suffix`
    fn draw(&self, suffix: &str) {
        if self.visible() {
            redraw(format_args!(
                "{}: {}% ({}/{}){suffix}",
                self.title.dimmed(),
                self.percent.to_string().dimmed(),
                self.current,
                self.total
            ));
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        // An unfinished line still needs its newline
        if self.visible() && self.current < self.total {
            eprintln!();
        }
    }
}

/// A running count for work whose size is not known up front, such as
/// walking a tree or reading the sync tool's output.
///
/// Renders like "Scanning source: 5120 paths".
pub struct Counter {
    /// Text before the count
    title: String,
    /// Plural noun after the count
    unit: &'static str,
    /// Latest count
    count: usize,
    /// Whether stderr is a TTY
    is_tty: bool,
    /// Redraw only every `step` increments
    step: usize,
}

impl Counter {
    /// Creates a counter; `unit` is the plural noun printed after the count.
    #[must_use]
    pub fn new(title: &str, unit: &'static str) -> Self {
        Self::with_tty(title, unit, io::stderr().is_terminal())
    }

    /// Construct with an explicit TTY answer
    fn with_tty(title: &str, unit: &'static str, is_tty: bool) -> Self {
        Self {
            title: title.to_string(),
            unit,
            count: 0,
            is_tty,
            step: 64,
        }
    }

    /// Latest count recorded
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Records the latest count and redraws when it crosses a step boundary.
    pub fn update(&mut self, count: usize) {
        let previous = self.count / self.step;
        self.count = count;
        if self.is_tty && count / self.step != previous {
            redraw(format_args!("{}: {} {}", self.title.dimmed(), count, self.unit));
        }
    }

    /// Prints the final count with a "done" suffix.
    pub fn finish(self) {
        if self.is_tty {
            redraw(format_args!(
                "{}: {} {}, done.\n",
                self.title.dimmed(),
                self.count,
                self.unit
            ));
        }
    }
}

/// Whole percentage of `done` out of `total`; zero when there is no total
#[allow(clippy::cast_possible_truncation)]
const fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (done * 100 / total) as u8
    }
}

/// Return to the start of the line and print `line` over it
fn redraw(line: fmt::Arguments<'_>) {
    eprint!("\r{line}");
    io::stderr().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_starts_at_zero() {
        let progress = Progress::with_tty("Comparing", 100, false);
        assert_eq!(progress.current, 0);
        assert_eq!(progress.percent, 0);
        assert!(!progress.visible());
    }

    #[test]
    fn test_progress_tracks_whole_percentages() {
        let mut progress = Progress::with_tty("Comparing", 200, false);
        progress.update(51);
        assert_eq!(progress.percent, 25);
        progress.update(200);
        assert_eq!(progress.percent, 100);
        progress.finish();
    }

    #[test]
    fn test_progress_clamps_to_total() {
        let mut progress = Progress::with_tty("Comparing", 10, false);
        progress.update(20);
        assert_eq!(progress.current, 10);
    }

    #[test]
    fn test_progress_zero_total_stays_at_zero() {
        let mut progress = Progress::with_tty("Comparing", 0, true);
        progress.update(5);
        assert_eq!(progress.current, 0);
        assert_eq!(progress.percent, 0);
        assert!(!progress.visible());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(7, 7), 100);
    }

    #[test]
    fn test_counter_tracks_latest_value() {
        let mut counter = Counter::with_tty("Scanning", "paths", false);
        counter.update(10);
        counter.update(200);
        assert_eq!(counter.count(), 200);
        counter.finish();
    }
}
