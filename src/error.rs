use std::fmt;
use std::path::PathBuf;

/// Fatal failure classes that abort a comparison run.
///
/// Everything else (unparseable tool output, unknown message keywords,
/// items that vanished between listing and inspection) is recovered where it
/// happens and never surfaces as a `DiffError`.
#[derive(Debug)]
pub enum DiffError {
    /// A comparison root or a setting is missing or invalid
    Configuration(String),
    /// The external synchronization tool could not be run or failed
    Subprocess {
        /// Program that was (or would have been) executed
        program: String,
        /// What went wrong
        detail: String,
    },
    /// A walked path did not start with the root it was walked from
    PathConsistency {
        /// Root the path was expected to live under
        root: PathBuf,
        /// Offending path
        path: PathBuf,
    },
}

impl DiffError {
    /// Build a configuration error from anything printable
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build a subprocess error for `program`
    pub fn subprocess(program: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Subprocess {
            program: program.into(),
            detail: detail.into(),
        }
    }

    /// Get a short description of the error type
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "Configuration Error",
            Self::Subprocess { .. } => "Subprocess Error",
            Self::PathConsistency { .. } => "Path Consistency Error",
        }
    }
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "{msg}"),
            Self::Subprocess { program, detail } => write!(f, "{program}: {detail}"),
            Self::PathConsistency { root, path } => write!(
                f,
                "Root dir wasn't found at the beginning of path (root: {}, path: {})",
                root.display(),
                path.display()
            ),
        }
    }
}

impl std::error::Error for DiffError {}
