//! Structural conversion between SDI trees and typed [`Table`] descriptors.
//!
//! A table SDI is an envelope around the table object:
//!
//! ```text
//! {"mysqld_version_id":80023,"dd_version":80023,"sdi_version":80019,
//!  "dd_object_type":"Table","dd_object":{"name":"t1",...}}
//! ```
//!
//! [`Dictionary`] is strict: it only accepts SDI whose `sdi_version` and
//! `dd_version` equal its own [`CanonicalVersions`]. Documents from other versions
//! have to go through the [`Reconciler`](crate::Reconciler) first.

use crate::document::{kind_name, SdiDocument};
use crate::error::{Error, Result};
use crate::options::Layout;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SDI format version emitted by this system.
pub const SDI_VERSION: u64 = 80019;
/// Dictionary schema version emitted by this system.
pub const DD_VERSION: u32 = 80023;
/// Server version recorded in new SDI envelopes.
pub const MYSQLD_VERSION_ID: u32 = 80023;

const TABLE_OBJECT_TYPE: &str = "Table";

/// The (SDI format, dictionary schema) version pair a system natively produces.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::{CanonicalVersions, DD_VERSION, SDI_VERSION};
///
/// let current = CanonicalVersions::default();
/// assert_eq!(current, CanonicalVersions::new(SDI_VERSION, DD_VERSION));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalVersions {
    /// Version of the SDI document format.
    pub sdi_version: u64,
    /// Version of the dictionary schema the table object follows.
    pub dd_version: u32,
}

impl CanonicalVersions {
    /// Creates a version pair.
    #[must_use]
    pub const fn new(sdi_version: u64, dd_version: u32) -> Self {
        CanonicalVersions {
            sdi_version,
            dd_version,
        }
    }
}

impl Default for CanonicalVersions {
    fn default() -> Self {
        CanonicalVersions::new(SDI_VERSION, DD_VERSION)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    mysqld_version_id: u32,
    dd_version: u32,
    sdi_version: u64,
    dd_object_type: &'a str,
    dd_object: &'a Table,
}

#[derive(Deserialize)]
struct Envelope {
    dd_version: u32,
    sdi_version: u64,
    dd_object_type: String,
    dd_object: Table,
}

/// The dictionary's structural (de)serializer for table SDI.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::{Dictionary, Table};
///
/// let dictionary = Dictionary::new();
/// let sdi = dictionary.serialize(&Table::new("t1", "ndbcluster"), "test").unwrap();
/// let table = dictionary.deserialize(sdi.as_bytes()).unwrap();
/// assert_eq!(table.name, "t1");
/// assert_eq!(table.schema_ref, "test");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dictionary {
    versions: CanonicalVersions,
    mysqld_version_id: u32,
}

impl Dictionary {
    /// Creates a dictionary with the built-in version constants.
    #[must_use]
    pub fn new() -> Self {
        Dictionary::with_versions(CanonicalVersions::default())
    }

    /// Creates a dictionary that produces and accepts a different version pair.
    #[must_use]
    pub const fn with_versions(versions: CanonicalVersions) -> Self {
        Dictionary {
            versions,
            mysqld_version_id: MYSQLD_VERSION_ID,
        }
    }

    /// The version pair this dictionary emits and accepts.
    #[must_use]
    pub const fn versions(&self) -> CanonicalVersions {
        self.versions
    }

    /// Builds the SDI tree for `table`, owned by `schema_name`.
    ///
    /// # Errors
    ///
    /// Returns a structural-mismatch error if the table cannot be represented.
    pub fn to_tree(&self, table: &Table, schema_name: &str) -> Result<SdiDocument> {
        let envelope = EnvelopeRef {
            mysqld_version_id: self.mysqld_version_id,
            dd_version: self.versions.dd_version,
            sdi_version: self.versions.sdi_version,
            dd_object_type: TABLE_OBJECT_TYPE,
            dd_object: table,
        };
        let mut tree = serde_json::to_value(envelope).map_err(Error::structural)?;
        if let Some(object) = tree.get_mut("dd_object").and_then(Value::as_object_mut) {
            object.insert("schema_ref".to_string(), Value::from(schema_name));
        }
        Ok(SdiDocument::from_value(tree))
    }

    /// Converts an SDI tree into a [`Table`].
    ///
    /// # Errors
    ///
    /// Returns a structural-mismatch error if the envelope is not a table SDI at
    /// this dictionary's versions, or the table object does not match the schema.
    pub fn from_tree(&self, doc: SdiDocument) -> Result<Table> {
        let value = doc.into_value();
        if !value.is_object() {
            return Err(Error::structural(format!(
                "expected an SDI envelope object, found {}",
                kind_name(&value)
            )));
        }
        let envelope: Envelope = serde_json::from_value(value).map_err(Error::structural)?;

        if envelope.sdi_version != self.versions.sdi_version {
            return Err(Error::structural(format!(
                "sdi_version {} does not match {}",
                envelope.sdi_version, self.versions.sdi_version
            )));
        }
        if envelope.dd_version != self.versions.dd_version {
            return Err(Error::structural(format!(
                "dd_version {} does not match {}",
                envelope.dd_version, self.versions.dd_version
            )));
        }
        if envelope.dd_object_type != TABLE_OBJECT_TYPE {
            return Err(Error::structural(format!(
                "dd_object_type `{}` is not `{TABLE_OBJECT_TYPE}`",
                envelope.dd_object_type
            )));
        }
        Ok(envelope.dd_object)
    }

    /// Serializes `table` to compact SDI text.
    ///
    /// # Errors
    ///
    /// See [`Dictionary::to_tree`].
    pub fn serialize(&self, table: &Table, schema_name: &str) -> Result<String> {
        self.to_tree(table, schema_name)?.render(Layout::Compact, 0)
    }

    /// Parses SDI text and converts it into a [`Table`].
    ///
    /// # Errors
    ///
    /// Returns a structural-mismatch error for unparseable input as well as for
    /// content rejected by [`Dictionary::from_tree`].
    pub fn deserialize(&self, sdi: &[u8]) -> Result<Table> {
        let doc = SdiDocument::parse(sdi).map_err(|e| Error::structural(e.to_string()))?;
        self.from_tree(doc)
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn sample() -> Table {
        let mut table = Table::new("t1", "ndbcluster");
        table.columns.push(Column::new("id", 4, 1));
        table.schema_ref = "stale".to_string();
        table
    }

    #[test]
    fn test_envelope_layout() {
        let sdi = Dictionary::new().serialize(&sample(), "test").unwrap();
        assert!(sdi.starts_with(
            r#"{"mysqld_version_id":80023,"dd_version":80023,"sdi_version":80019,"dd_object_type":"Table","dd_object":{"name":"t1","#
        ));
        assert!(sdi.contains(r#""schema_ref":"test""#));
        assert!(!sdi.contains("stale"));
    }

    #[test]
    fn test_schema_ref_keeps_position() {
        let tree = Dictionary::new().to_tree(&sample(), "test").unwrap();
        let keys: Vec<_> = tree.as_value()["dd_object"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys[7], "schema_ref");
    }

    #[test]
    fn test_round_trip() {
        let dictionary = Dictionary::new();
        let sdi = dictionary.serialize(&sample(), "test").unwrap();
        let table = dictionary.deserialize(sdi.as_bytes()).unwrap();
        assert_eq!(table.schema_ref, "test");
        assert_eq!(table.columns, sample().columns);
    }

    #[test]
    fn test_rejects_foreign_versions() {
        let old = Dictionary::with_versions(CanonicalVersions::new(1, 80016));
        let sdi = old.serialize(&sample(), "test").unwrap();

        let err = Dictionary::new().deserialize(sdi.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::StructuralMismatch);
        assert!(err.to_string().contains("sdi_version 1"));
    }

    #[test]
    fn test_rejects_other_object_types() {
        let dictionary = Dictionary::new();
        let mut tree = dictionary.to_tree(&sample(), "test").unwrap().into_value();
        tree["dd_object_type"] = Value::from("Tablespace");
        let err = dictionary
            .from_tree(SdiDocument::from_value(tree))
            .unwrap_err();
        assert!(err.to_string().contains("Tablespace"));
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Dictionary::new()
            .from_tree(SdiDocument::parse(b"[]").unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::StructuralMismatch);
    }

    #[test]
    fn test_unpackable_timestamp_fails_serialize() {
        use crate::timestamp::Timestamp;
        use chrono::NaiveDate;

        let mut table = sample();
        table.created = NaiveDate::from_ymd_opt(10000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Timestamp::new)
            .unwrap();

        let err = Dictionary::new().serialize(&table, "test").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::StructuralMismatch);
        assert!(err.to_string().contains("outside years"));
    }

    #[test]
    fn test_server_version_id_is_optional() {
        let dictionary = Dictionary::new();
        let mut tree = dictionary.to_tree(&sample(), "test").unwrap().into_value();
        if let Some(envelope) = tree.as_object_mut() {
            envelope.remove("mysqld_version_id");
        }
        let table = dictionary.from_tree(SdiDocument::from_value(tree)).unwrap();
        assert_eq!(table.name, "t1");
    }
}
