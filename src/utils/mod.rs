//! Utility functions for string comparison and formatting.

pub mod format;

pub use format::{cmp_ignore_case, contains_ignore_case, truncate};
