//! Sync schema: the ordered list of `(source, destination)` entries.
//!
//! The on-disk format is a YAML sequence of `{src, dest}` maps:
//!
//! ```yaml
//! - src: bashrc
//!   dest: /home/user/.bashrc
//! - src: /opt/shared/gitconfig
//!   dest: /home/user/.gitconfig
//! ```
//!
//! Relative `src` values are stored verbatim and resolved against the
//! directory holding the schema file at reconciliation time.
pub mod store;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub use store::{load, read_or_create, save};

/// One mapping the engine keeps in agreement via a symlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntry {
    /// What the symlink points to; may be relative to the schema directory.
    #[serde(rename = "src")]
    pub source: String,
    /// Where the symlink must exist.
    #[serde(rename = "dest")]
    pub destination: String,
}

impl SyncEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Reject entries with an empty `source` or `destination`.
    ///
    /// `index` is attached to the error when validating a decoded schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ObligatoryFieldMissing`] naming the empty field.
    pub fn validate(&self, index: Option<usize>) -> Result<(), SchemaError> {
        if self.source.is_empty() {
            return Err(SchemaError::ObligatoryFieldMissing {
                field: "source",
                entry: index,
            });
        }
        if self.destination.is_empty() {
            return Err(SchemaError::ObligatoryFieldMissing {
                field: "destination",
                entry: index,
            });
        }
        Ok(())
    }
}

/// Ordered collection of all entries for one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    entries: Vec<SyncEntry>,
}

impl Schema {
    /// Create an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `entry` at the end, preserving existing order.
    pub fn append(&mut self, entry: SyncEntry) {
        self.entries.push(entry);
    }

    /// Decode a schema from its serialized bytes.
    ///
    /// Empty (or whitespace-only) input and a YAML `null` document decode to
    /// the empty schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if the bytes are not a YAML list of
    /// `{src, dest}` maps, or [`SchemaError::ObligatoryFieldMissing`] if an
    /// entry has an empty field.
    pub fn decode(bytes: &[u8]) -> Result<Self, SchemaError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        let entries: Option<Vec<SyncEntry>> =
            serde_yaml::from_slice(bytes).map_err(|e| SchemaError::Parse {
                message: e.to_string(),
            })?;
        let schema = Self {
            entries: entries.unwrap_or_default(),
        };
        for (i, entry) in schema.entries.iter().enumerate() {
            entry.validate(Some(i))?;
        }
        Ok(schema)
    }

    /// Serialize the schema to YAML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Serialize`] if the YAML encoder fails.
    pub fn encode(&self) -> Result<Vec<u8>, SchemaError> {
        serde_yaml::to_string(&self.entries)
            .map(String::into_bytes)
            .map_err(|e| SchemaError::Serialize {
                message: e.to_string(),
            })
    }
}

impl From<Vec<SyncEntry>> for Schema {
    fn from(entries: Vec<SyncEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SyncEntry;
    type IntoIter = std::slice::Iter<'a, SyncEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::from(vec![
            SyncEntry::new("bashrc", "/home/u/.bashrc"),
            SyncEntry::new("/opt/shared/gitconfig", "/home/u/.gitconfig"),
            SyncEntry::new("../other/vimrc", "relative/.vimrc"),
        ])
    }

    #[test]
    fn round_trip_preserves_entries_and_order() {
        let schema = sample();
        let decoded = Schema::decode(&schema.encode().unwrap()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn round_trip_empty_schema() {
        let schema = Schema::new();
        let decoded = Schema::decode(&schema.encode().unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn round_trip_values_needing_quotes() {
        let schema = Schema::from(vec![
            SyncEntry::new("yes", "/tmp/with space/: colon"),
            SyncEntry::new("123", "~/.config/#hash"),
        ]);
        let decoded = Schema::decode(&schema.encode().unwrap()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn encode_uses_src_and_dest_keys() {
        let schema = Schema::from(vec![SyncEntry::new("bashrc", "/home/u/.bashrc")]);
        let yaml = String::from_utf8(schema.encode().unwrap()).unwrap();
        insta::assert_snapshot!(yaml, @r"
        - src: bashrc
          dest: /home/u/.bashrc
        ");
    }

    #[test]
    fn decode_empty_bytes_is_empty_schema() {
        assert!(Schema::decode(b"").unwrap().is_empty());
        assert!(Schema::decode(b"  \n\n").unwrap().is_empty());
    }

    #[test]
    fn decode_null_document_is_empty_schema() {
        assert!(Schema::decode(b"~\n").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let err = Schema::decode(b"syncfile: /tmp/x\n").unwrap_err();
        assert!(matches!(err, SchemaError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn decode_rejects_missing_key() {
        let err = Schema::decode(b"- src: bashrc\n").unwrap_err();
        assert!(matches!(err, SchemaError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn decode_rejects_empty_field_with_index() {
        let err = Schema::decode(b"- src: a\n  dest: b\n- src: ''\n  dest: c\n").unwrap_err();
        assert!(
            matches!(
                err,
                SchemaError::ObligatoryFieldMissing {
                    field: "source",
                    entry: Some(1)
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn append_preserves_order() {
        let mut schema = sample();
        let before = schema.entries().to_vec();
        schema.append(SyncEntry::new("zshrc", "/home/u/.zshrc"));
        assert_eq!(schema.len(), before.len() + 1);
        assert_eq!(&schema.entries()[..before.len()], before.as_slice());
        assert_eq!(schema.entries()[before.len()].source, "zshrc");
    }

    #[test]
    fn validate_rejects_empty_destination() {
        let err = SyncEntry::new("a", "").validate(None).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ObligatoryFieldMissing {
                field: "destination",
                entry: None
            }
        ));
    }

    #[test]
    fn decode_keeps_whitespace_values() {
        let schema = Schema::decode(b"- src: ' '\n  dest: b\n").unwrap();
        assert_eq!(schema.entries()[0].source, " ");
        assert!(SyncEntry::new(" ", "b").validate(None).is_ok());
    }
}
