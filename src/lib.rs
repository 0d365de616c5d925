//! # sdi_codec
//!
//! Serialization boundary for SDI (Serialized Dictionary Information): the JSON
//! documents a storage engine keeps so it can hand table definitions back to the
//! metadata dictionary.
//!
//! ## Version reconciliation
//!
//! The dictionary only deserializes SDI whose `sdi_version` and `dd_version` equal
//! its own. SDI written by an older or newer server, such as one received over
//! replication during a rolling upgrade, would be rejected purely for its version
//! numbers. [`deserialize`] parses the document and rewrites exactly those two fields
//! to the running system's [`CanonicalVersions`], then passes the result to the
//! dictionary. Everything else is left untouched, so a genuine incompatibility
//! still fails, as [`ErrorKind::StructuralMismatch`].
//!
//! ## Canonical form
//!
//! Stored SDI is always compact JSON. [`serialize`] can verify that its output is
//! byte-identical to its own compact rendering (see
//! [`SdiOptions::with_invariant_checks`]). [`prettify`] renders any SDI indented
//! for humans.
//!
//! ## Quick Start
//!
//! ```rust
//! use sdi_codec::{deserialize, prettify, serialize, Column, Table};
//!
//! let mut table = Table::new("t1", "ndbcluster");
//! table.columns.push(Column::new("id", 4, 1));
//!
//! let sdi = serialize(&table, "test").unwrap();
//! assert!(sdi.starts_with(r#"{"mysqld_version_id":"#));
//!
//! let back = deserialize(sdi.as_bytes()).unwrap();
//! assert_eq!(back.columns, table.columns);
//!
//! println!("{}", prettify(sdi.as_bytes()).unwrap());
//! ```
//!
//! ## Working with the document tree
//!
//! ```rust
//! use sdi_codec::{CanonicalVersions, Layout, Reconciler, SdiDocument};
//!
//! let mut doc = SdiDocument::parse(br#"{"sdi_version":1,"dd_version":80700,"name":"t1"}"#)?;
//! let report = Reconciler::new(CanonicalVersions::new(2, 80800)).reconcile(&mut doc)?;
//!
//! assert!(report.sdi_version.is_rewritten());
//! assert_eq!(
//!     doc.render(Layout::Compact, 0)?,
//!     r#"{"sdi_version":2,"dd_version":80800,"name":"t1"}"#
//! );
//! # Ok::<(), sdi_codec::Error>(())
//! ```
//!
//! ## Thread safety
//!
//! All operations are synchronous and touch no shared mutable state. An
//! [`SdiCodec`] can be shared freely across threads.

pub mod codec;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod options;
pub mod properties;
pub mod reconcile;
pub mod table;
pub mod timestamp;

pub use codec::SdiCodec;
pub use dictionary::{CanonicalVersions, Dictionary, DD_VERSION, SDI_VERSION};
pub use document::SdiDocument;
pub use error::{Error, ErrorKind, Result};
pub use options::{Layout, SdiOptions};
pub use properties::{Properties, PropertiesError};
pub use reconcile::{FieldChange, Reconciler, Reconciliation};
pub use table::{Column, Index, IndexElement, Table};
pub use timestamp::Timestamp;

/// Renders SDI in indented form.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::prettify;
///
/// let pretty = prettify(br#"{"name":"t1"}"#).unwrap();
/// assert_eq!(pretty, "{\n    \"name\": \"t1\"\n}");
/// assert!(prettify(b"{not json").is_err());
/// ```
///
/// # Errors
///
/// Returns a malformed-document error if `sdi` does not parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn prettify(sdi: &[u8]) -> Result<String> {
    SdiCodec::default().prettify(sdi)
}

/// Renders SDI in compact form.
///
/// # Errors
///
/// Returns a malformed-document error if `sdi` does not parse.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn minify(sdi: &[u8]) -> Result<String> {
    SdiCodec::default().minify(sdi)
}

/// Returns `true` if `sdi` is already in compact canonical form.
#[must_use]
pub fn verify_canonical(sdi: &[u8]) -> bool {
    SdiCodec::default().verify_canonical(sdi)
}

/// Deserializes SDI into a [`Table`], reconciling version skew first.
///
/// # Errors
///
/// Returns a malformed-document error for unparseable input or bad version fields,
/// and a structural-mismatch error if the dictionary rejects the content.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn deserialize(sdi: &[u8]) -> Result<Table> {
    SdiCodec::default().deserialize(sdi)
}

/// Serializes a [`Table`] owned by `schema_name` to compact SDI.
///
/// The canonical-form self-check runs in debug builds.
///
/// # Errors
///
/// Returns an error if the table cannot be represented or, with invariant checks
/// enabled, if the output is not canonical.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn serialize(table: &Table, schema_name: &str) -> Result<String> {
    SdiCodec::default().serialize(table, schema_name)
}
