//! Utility functions for string and date formatting.

pub mod format;

pub use format::{format_date, format_day, relative_age, truncate_string};
