//! Utility functions and helpers.
//!
//! - [`formatters`]: time span and clock label formatting
//! - [`paths`]: root-relative path handling

/// Output formatting helpers
pub mod formatters;
/// Root-relative path handling
pub mod paths;
