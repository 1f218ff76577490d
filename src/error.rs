//! Domain-specific error types for the dotlink engine.
//!
//! Internal modules return typed errors ([`SchemaError`], [`ConfigError`],
//! [`LinkError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotlinkError
//! ├── Config(ConfigError)  : config file I/O, parsing, sync file lookup
//! ├── Schema(SchemaError)  : schema file I/O, YAML decoding, entry validation
//! └── Link(LinkError)      : per-entry symlink inspection and mutation
//! ```
//!
//! A destination occupied by a regular file or directory is *not* an error:
//! the reconciliation engine reports it as [`Outcome::Conflict`](crate::reconcile::Outcome).

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotlink engine.
#[derive(Error, Debug)]
pub enum DotlinkError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schema store or registration error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Symlink operation error.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
}

/// Errors that arise from loading and saving the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read or written.
    #[error("IO error on config file {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The config file is not valid YAML of the expected shape.
    #[error("Invalid config file {}: {message}", .path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The config could not be serialized.
    #[error("Failed to serialize config: {message}")]
    Serialize {
        /// Encoder message.
        message: String,
    },

    /// No sync file has been recorded in the config yet.
    #[error("config was not initialised: run `dotlink init` first")]
    NotInitialised,

    /// `init` could not find a sync file in the working directory.
    #[error("no sync file (named {name}) found in working directory {}", .dir.display())]
    SyncFileNotFound {
        /// Expected file name.
        name: String,
        /// Directory that was searched.
        dir: PathBuf,
    },
}

/// Errors that arise from the schema store and entry registration.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be opened, created, read, or written.
    #[error("IO error on schema file {}: {source}", .path.display())]
    Io {
        /// Path of the schema file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The schema bytes are not a YAML list of `{src, dest}` entries.
    #[error("Invalid schema: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },

    /// The schema could not be serialized.
    #[error("Failed to serialize schema: {message}")]
    Serialize {
        /// Encoder message.
        message: String,
    },

    /// A required entry field was empty.
    #[error(
        "obligatory field '{field}' was not provided{}",
        .entry.map(|i| format!(" (entry {i})")).unwrap_or_default()
    )]
    ObligatoryFieldMissing {
        /// Name of the missing field (`source` or `destination`).
        field: &'static str,
        /// Zero-based index of the offending entry when decoding a schema.
        entry: Option<usize>,
    },
}

/// The filesystem step during which a [`LinkError`] occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOperation {
    /// Querying the destination without following symlinks.
    Inspect,
    /// Reading the target of an existing symlink.
    ReadLink,
    /// Removing an existing symlink.
    Remove,
    /// Creating the new symlink.
    Create,
}

impl fmt::Display for LinkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inspect => "inspect",
            Self::ReadLink => "read link",
            Self::Remove => "remove link",
            Self::Create => "create link",
        };
        f.write_str(s)
    }
}

/// Errors that arise while reconciling a single entry.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A filesystem call failed.
    #[error("{operation} failed for {}: {source}", .path.display())]
    Io {
        /// Step that failed.
        operation: LinkOperation,
        /// Destination path of the entry.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl LinkError {
    /// Wrap an I/O error raised during `operation` on `path`.
    #[must_use]
    pub fn io(operation: LinkOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// The step that failed.
    #[must_use]
    pub const fn operation(&self) -> LinkOperation {
        match self {
            Self::Io { operation, .. } => *operation,
        }
    }
}
