use super::{Counter, Progress, Verbosity, get_verbosity, verbose};
use crate::observer::{ComparisonPass, Observer};

/// Whatever line is currently being redrawn on stderr
enum Display {
    /// Nothing on screen
    Idle,
    /// Running count of scanned paths or captured lines
    Counting(Counter),
    /// Percentage through one comparison pass
    Comparing(ComparisonPass, Progress),
}

/// Draws the engine's progress on stderr. Quiet mode draws nothing, and the
/// underlying lines stay silent when stderr is not a terminal.
pub struct TerminalObserver {
    /// Line currently being drawn
    display: Display,
    /// False in quiet mode
    enabled: bool,
}

impl TerminalObserver {
    /// Observer honoring the current global verbosity
    #[must_use]
    pub fn new() -> Self {
        Self {
            display: Display::Idle,
            enabled: get_verbosity() != Verbosity::Quiet,
        }
    }

    /// Feeds `count` to the running counter, starting one titled by `title`
    /// if none is active
    fn count(&mut self, title: impl FnOnce() -> String, unit: &'static str, count: usize) {
        if let Display::Counting(counter) = &mut self.display {
            counter.update(count);
            return;
        }
        let mut counter = Counter::new(&title(), unit);
        counter.update(count);
        self.display = Display::Counting(counter);
    }
}

impl Default for TerminalObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for TerminalObserver {
    fn paths_scanned(&mut self, root: &str, count: usize) {
        if !self.enabled {
            return;
        }
        self.count(|| format!("Scanning {root}"), "paths", count);
    }

    fn items_compared(&mut self, pass: ComparisonPass, done: usize, total: usize) {
        if !self.enabled {
            return;
        }
        let same_pass = matches!(&self.display, Display::Comparing(current, _) if *current == pass);
        if !same_pass {
            let title = match pass {
                ComparisonPass::SourceToBackup => "Comparing source to backup",
                ComparisonPass::BackupToSource => "Comparing backup to source",
            };
            self.display = Display::Comparing(pass, Progress::new(title, total));
        }
        if let Display::Comparing(_, progress) = &mut self.display {
            progress.update(done);
        }
    }

    fn lines_captured(&mut self, count: usize) {
        if !self.enabled {
            return;
        }
        self.count(|| "Capturing rsync output".to_string(), "lines", count);
    }

    fn reduction_step(&mut self, iteration: usize, remaining: usize) {
        verbose(&format!(
            "Cleaning pass {iteration}: {remaining} entries remaining"
        ));
    }

    fn phase_finished(&mut self) {
        match std::mem::replace(&mut self.display, Display::Idle) {
            Display::Idle => {}
            Display::Counting(counter) => counter.finish(),
            Display::Comparing(_, progress) => progress.finish(),
        }
    }
}
