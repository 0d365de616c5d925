//! Typed table descriptor carried inside an SDI.
//!
//! These types mirror the `dd_object` of a table SDI. Field order matches the
//! order the dictionary emits, because compact SDI is compared byte-for-byte.
//! Enumerated attributes (column type, row format, index algorithm, ...) are kept
//! as the dictionary's numeric codes.

use crate::properties::Properties;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A table definition as stored in an SDI.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::{Column, Table};
///
/// let mut table = Table::new("t1", "ndbcluster");
/// table.columns.push(Column::new("id", 4, 1));
/// assert_eq!(table.column("id").map(|c| c.ordinal_position), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub mysql_version_id: u32,
    pub created: Timestamp,
    pub last_altered: Timestamp,
    pub hidden: u32,
    pub options: Properties,
    pub columns: Vec<Column>,
    /// Name of the owning schema. Replaced by the caller's schema name on serialize.
    pub schema_ref: String,
    pub se_private_id: u64,
    pub engine: String,
    pub comment: String,
    pub se_private_data: Properties,
    pub row_format: u32,
    pub collation_id: u32,
    pub indexes: Vec<Index>,
}

/// One column of a [`Table`], in dictionary order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: u32,
    pub is_nullable: bool,
    pub is_zerofill: bool,
    pub is_unsigned: bool,
    pub is_auto_increment: bool,
    pub hidden: u32,
    pub ordinal_position: u32,
    pub char_length: u32,
    pub numeric_precision: u32,
    pub numeric_scale: u32,
    pub datetime_precision: u32,
    pub has_no_default: bool,
    pub default_value_null: bool,
    pub default_value_utf8: String,
    pub comment: String,
    pub collation_id: u32,
    pub column_type_utf8: String,
    pub se_private_data: Properties,
}

/// An index of a [`Table`]. Key parts refer to columns by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub hidden: bool,
    pub is_generated: bool,
    pub ordinal_position: u32,
    pub comment: String,
    pub options: Properties,
    pub se_private_data: Properties,
    #[serde(rename = "type")]
    pub index_type: u32,
    pub algorithm: u32,
    pub is_algorithm_explicit: bool,
    pub is_visible: bool,
    pub engine: String,
    pub elements: Vec<IndexElement>,
}

/// One key part of an [`Index`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexElement {
    pub ordinal_position: u32,
    pub length: u32,
    pub order: u32,
    pub hidden: bool,
    /// Zero-based position of the indexed column in [`Table::columns`].
    pub column_opx: u32,
}

impl Table {
    /// Creates an empty, visible table for `engine`.
    pub fn new(name: impl Into<String>, engine: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            mysql_version_id: crate::dictionary::MYSQLD_VERSION_ID,
            created: Timestamp::UNSET,
            last_altered: Timestamp::UNSET,
            hidden: 1,
            options: Properties::new(),
            columns: Vec::new(),
            schema_ref: String::new(),
            se_private_id: 0,
            engine: engine.into(),
            comment: String::new(),
            se_private_data: Properties::new(),
            row_format: 2,
            collation_id: 255,
            indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

impl Column {
    /// Creates a nullable, visible column with the given dictionary type code.
    pub fn new(name: impl Into<String>, column_type: u32, ordinal_position: u32) -> Self {
        Column {
            name: name.into(),
            column_type,
            is_nullable: true,
            is_zerofill: false,
            is_unsigned: false,
            is_auto_increment: false,
            hidden: 1,
            ordinal_position,
            char_length: 0,
            numeric_precision: 0,
            numeric_scale: 0,
            datetime_precision: 0,
            has_no_default: false,
            default_value_null: true,
            default_value_utf8: String::new(),
            comment: String::new(),
            collation_id: 255,
            column_type_utf8: String::new(),
            se_private_data: Properties::new(),
        }
    }
}

impl Index {
    /// Creates a visible, non-generated index with no key parts.
    pub fn new(name: impl Into<String>, index_type: u32, ordinal_position: u32) -> Self {
        Index {
            name: name.into(),
            hidden: false,
            is_generated: false,
            ordinal_position,
            comment: String::new(),
            options: Properties::new(),
            se_private_data: Properties::new(),
            index_type,
            algorithm: 2,
            is_algorithm_explicit: false,
            is_visible: true,
            engine: String::new(),
            elements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_fields_are_renamed() {
        let column = Column::new("id", 4, 1);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["type"], 4);
        assert!(json.get("column_type").is_none());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = serde_json::from_str::<IndexElement>(
            r#"{"ordinal_position":1,"length":4,"order":2,"hidden":false}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("column_opx"));
    }

    #[test]
    fn test_lookup_by_name() {
        let mut table = Table::new("t1", "ndbcluster");
        table.columns.push(Column::new("a", 4, 1));
        table.columns.push(Column::new("b", 16, 2));
        table.indexes.push(Index::new("PRIMARY", 1, 1));

        assert_eq!(table.column("b").map(|c| c.column_type), Some(16));
        assert!(table.column("c").is_none());
        assert!(table.index("PRIMARY").is_some());
    }
}
