//! Error taxonomy for [`ConfigStore`](crate::ConfigStore) operations.
//!
//! Every failure is a variant of the closed [`ConfigError`] enum, so callers
//! branch with a plain `match` instead of inspecting message strings.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path given to `load` does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The grammar rejected the file contents.
    #[error("cannot parse {} (line {line}): {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The file could not be opened for writing or the write failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `save` was called but no path was ever established.
    #[error("no file path established, load a file or set a path first")]
    NoPath,

    /// An accessor was called before anything was loaded or set, and no
    /// default was supplied.
    #[error("configuration is empty, no sections")]
    EmptyConfig,

    /// The key (or its section) is absent and no default was supplied.
    #[error("key not found: [{section}] {key}")]
    KeyNotFound { section: String, key: String },

    /// The section is absent and no default was supplied.
    #[error("section not found: [{section}]")]
    SectionNotFound { section: String },

    /// The stored value is not a recognised boolean token and no default was
    /// supplied.
    #[error("not a boolean: [{section}] {key} = {value:?}")]
    InvalidBoolean {
        section: String,
        key: String,
        value: String,
    },

    /// A section name or key is not a valid scalar name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
