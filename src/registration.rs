//! Entry registration: validate a new mapping and append it to a schema.
use std::path::Path;

use crate::error::SchemaError;
use crate::schema::{self, Schema, SyncEntry};

/// Validate `source` and `destination` and return `schema` with the new
/// entry appended.
///
/// No duplicate-destination check is made; when two entries share a
/// destination the later one wins during reconciliation.
///
/// # Errors
///
/// Returns [`SchemaError::ObligatoryFieldMissing`] if either value is empty.
///
/// # Examples
///
/// ```
/// use dotlink::registration::register;
/// use dotlink::schema::Schema;
///
/// let schema = register(Schema::new(), "bashrc", "/home/u/.bashrc").unwrap();
/// assert_eq!(schema.len(), 1);
/// assert!(register(schema, "", "/home/u/.vimrc").is_err());
/// ```
pub fn register(mut schema: Schema, source: &str, destination: &str) -> Result<Schema, SchemaError> {
    let entry = SyncEntry::new(source, destination);
    entry.validate(None)?;
    schema.append(entry);
    Ok(schema)
}

/// Load (or create) the schema at `schema_path`, register the new entry,
/// and persist the full schema back to the same path.
///
/// Validation happens before any write, so a rejected entry leaves the file
/// as it was (apart from being created if it did not exist).
///
/// # Errors
///
/// Returns a [`SchemaError`] if the file cannot be read, decoded or written,
/// or if validation fails.
pub fn register_in_file(
    schema_path: &Path,
    source: &str,
    destination: &str,
) -> Result<Schema, SchemaError> {
    let loaded = schema::load(schema_path)?;
    let updated = register(loaded, source, destination)?;
    schema::save(&updated, schema_path)?;
    tracing::debug!(
        path = %schema_path.display(),
        entries = updated.len(),
        "registered sync entry"
    );
    Ok(updated)
}
