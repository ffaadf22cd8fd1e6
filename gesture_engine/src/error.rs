//! Error types for profile loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading, parsing, validating or writing a [`GestureConfig`].
///
/// [`GestureConfig`]: crate::GestureConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile I/O failed for {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Profile field `{field}` = {value} is out of range ({expected})")]
    OutOfRange {
        field:    &'static str,
        value:    String,
        expected: &'static str,
    },
}

/// Result type for profile operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
