//! Error types for configuration and descriptor loading.

use std::path::PathBuf;

/// Errors that can occur when loading the design description or descriptor files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The YAML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration file is missing from its expected location.
    #[error("{} misses {file}", dir.display())]
    MissingFile {
        /// The directory that was searched.
        dir: PathBuf,
        /// The file name that was not found.
        file: String,
    },

    /// The file carries an unexpected `schema` identifier.
    #[error("unexpected schema '{found}' (expected '{expected}')")]
    BadSchema {
        /// The schema identifier required for this file kind.
        expected: String,
        /// The schema identifier actually present.
        found: String,
    },
}
