//! Schema file persistence.
//!
//! Writes are full, non-atomic overwrites: a crash mid-write can leave a
//! truncated file, which the next load reports as a parse error.
use std::fs;
use std::io;
use std::path::Path;

use super::Schema;
use crate::error::SchemaError;

/// Open `path` for reading, creating an empty file if it does not exist, and
/// return its full contents.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] if the file cannot be created, opened, or read.
pub fn read_or_create(path: &Path) -> Result<Vec<u8>, SchemaError> {
    let io_err = |source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    };
    match fs::read(path) {
        Ok(bytes) => return Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }

    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::debug!(path = %path.display(), "created empty sync schema");
            Ok(Vec::new())
        }
        // Created by someone else between the read and the create.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => fs::read(path).map_err(io_err),
        Err(e) => Err(io_err(e)),
    }
}

/// Load the schema at `path`, creating an empty file if it is absent.
///
/// # Errors
///
/// Returns [`SchemaError::Io`] on filesystem errors and
/// [`SchemaError::Parse`]/[`SchemaError::ObligatoryFieldMissing`] if the
/// contents are not a valid schema.
pub fn load(path: &Path) -> Result<Schema, SchemaError> {
    let bytes = read_or_create(path)?;
    let schema = Schema::decode(&bytes)?;
    tracing::debug!(path = %path.display(), entries = schema.len(), "loaded sync schema");
    Ok(schema)
}

/// Serialize `schema` and overwrite `path` entirely.
///
/// # Errors
///
/// Returns [`SchemaError::Serialize`] if encoding fails or
/// [`SchemaError::Io`] if the file cannot be written.
pub fn save(schema: &Schema, path: &Path) -> Result<(), SchemaError> {
    let bytes = schema.encode()?;
    fs::write(path, bytes).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), entries = schema.len(), "wrote sync schema");
    Ok(())
}
