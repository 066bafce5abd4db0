//! Domain-specific error types for the selector.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors ([`ConfigError`], [`DeployError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError  — catalog loading and validation
//! DeployError  — prompts, cleaning, copying, language tag
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from catalog loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a catalog file.
    #[error("IO error reading catalog file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file is not valid TOML or does not match the schema.
    #[error("Invalid catalog in {}: {message}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Two device profiles declare the same primary source.
    #[error("Duplicate device source '{0}'")]
    DuplicateSource(String),

    /// A device profile names a brand that the brand list does not declare.
    #[error("Device '{device}' uses undeclared brand '{brand}'")]
    UnknownBrand {
        /// Display name of the offending device.
        device: String,
        /// The undeclared brand.
        brand: String,
    },
}

/// Errors that arise while selecting and deploying a profile.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Standard input is not interactive or reached end of input.
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// A bundle source does not exist.
    #[error("source not found: {}", path.display())]
    NotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// A bundle source exists but is not a directory.
    #[error("source is not a directory: {}", path.display())]
    NotADirectory {
        /// The offending source path.
        path: PathBuf,
    },

    /// Creating a directory or copying a file failed.
    #[error("copy failed at {}: {source}", path.display())]
    CopyFailed {
        /// Path being created or written when the failure occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The destination root could not be enumerated for cleaning.
    #[error("cannot read destination {}: {source}", path.display())]
    CleanFailed {
        /// The destination root.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The language tag could not be written.
    #[error("cannot create language tag {}: {source}", path.display())]
    MarkerFailed {
        /// Path of the marker file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DeployError {
    /// Whether this error reports a missing or non-directory source.
    ///
    /// Overlays treat these as skippable; the primary bundle does not.
    #[must_use]
    pub const fn is_missing_source(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotADirectory { .. })
    }
}
