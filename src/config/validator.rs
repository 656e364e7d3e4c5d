use std::collections::HashSet;
use tracing::warn;

/// Flags configuration keys the program does not understand
pub struct ConfigValidator {
    /// Dotted names of every recognized key (`rsync.program`, ...)
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "scan",
            "scan.follow_symlinks",
            "rsync",
            "rsync.program",
            "rsync.ssh_program",
            "report",
            "report.clean",
            "report.color",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Collect the dotted names of keys in `content` that are not recognized.
    /// Text that is not valid TOML yields nothing; parsing reports that.
    #[must_use]
    pub fn unknown_fields(&self, content: &str) -> Vec<String> {
        let Ok(parsed) = toml::from_str::<toml::Value>(content) else {
            return Vec::new();
        };

        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        unknown
    }

    /// Log a warning for every unrecognized key in `content`
    pub fn warn_unknown_fields(&self, content: &str) {
        for field in self.unknown_fields(content) {
            warn!(field = %field, "Unknown configuration field");
        }
    }

    /// Collect keys of `table` (nested under `prefix`) that the schema lacks
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if !self.known_fields.contains(full_key.as_str()) {
                unknown.push(full_key);
            } else if let toml::Value::Table(_) = value {
                self.check_table(value, &full_key, unknown);
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
