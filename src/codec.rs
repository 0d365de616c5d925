//! The SDI boundary between a storage engine and the dictionary.
//!
//! [`SdiCodec`] composes the document codec, the [`Reconciler`] and the
//! [`Dictionary`]:
//!
//! - **serialize**: `Table` → dictionary tree → compact text, with an optional
//!   canonical-form self-check
//! - **deserialize**: text → tree → version reconciliation → compact text →
//!   dictionary → `Table`
//! - **prettify** / **minify**: re-render any SDI for humans or for storage

use crate::dictionary::Dictionary;
use crate::document::SdiDocument;
use crate::error::{Error, Result};
use crate::options::{Layout, SdiOptions};
use crate::reconcile::{Reconciler, Reconciliation};
use crate::table::Table;
use std::borrow::Cow;

/// Version-reconciling SDI codec.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::{SdiCodec, SdiOptions, Table};
///
/// let codec = SdiCodec::new(SdiOptions::new().with_invariant_checks(true));
/// let sdi = codec.serialize(&Table::new("t1", "ndbcluster"), "test").unwrap();
/// assert!(codec.verify_canonical(sdi.as_bytes()));
///
/// // An SDI written by an older server still deserializes
/// let old = sdi.replace("\"sdi_version\":80019", "\"sdi_version\":1");
/// let table = codec.deserialize(old.as_bytes()).unwrap();
/// assert_eq!(table.name, "t1");
/// ```
#[derive(Clone, Debug, Default)]
pub struct SdiCodec {
    dictionary: Dictionary,
    reconciler: Reconciler,
    options: SdiOptions,
}

impl SdiCodec {
    /// Creates a codec over the built-in dictionary.
    #[must_use]
    pub fn new(options: SdiOptions) -> Self {
        SdiCodec::with_dictionary(Dictionary::new(), options)
    }

    /// Creates a codec whose canonical versions come from `dictionary`.
    #[must_use]
    pub fn with_dictionary(dictionary: Dictionary, options: SdiOptions) -> Self {
        SdiCodec {
            dictionary,
            reconciler: Reconciler::new(dictionary.versions()),
            options,
        }
    }

    /// The dictionary deserialized tables are checked against.
    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    #[must_use]
    pub fn options(&self) -> &SdiOptions {
        &self.options
    }

    /// Renders SDI in indented form for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if `sdi` does not parse.
    pub fn prettify(&self, sdi: &[u8]) -> Result<String> {
        SdiDocument::parse(sdi)?.render(Layout::Pretty, self.options.indent)
    }

    /// Renders SDI in compact form, the only form that is stored.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if `sdi` does not parse.
    pub fn minify(&self, sdi: &[u8]) -> Result<String> {
        SdiDocument::parse(sdi)?.render(Layout::Compact, 0)
    }

    /// Returns `true` if `sdi` is byte-identical to its own compact rendering.
    ///
    /// Unparseable input is never canonical.
    #[must_use]
    pub fn verify_canonical(&self, sdi: &[u8]) -> bool {
        self.minify(sdi)
            .map(|canonical| canonical.as_bytes() == sdi)
            .unwrap_or(false)
    }

    /// Reconciles the version fields of a parsed SDI in place.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::reconcile`].
    pub fn reconcile(&self, doc: &mut SdiDocument) -> Result<Reconciliation> {
        self.reconciler.reconcile(doc)
    }

    /// Deserializes SDI into a [`Table`], absorbing any version skew.
    ///
    /// When both versions already match, `sdi` is handed to the dictionary as is.
    /// Otherwise the reconciled tree is re-rendered compact first.
    ///
    /// # Errors
    ///
    /// - malformed document: `sdi` does not parse, or its version fields are
    ///   missing or mistyped
    /// - structural mismatch: the dictionary rejects the reconciled content
    pub fn deserialize(&self, sdi: &[u8]) -> Result<Table> {
        let mut doc = SdiDocument::parse(sdi)?;
        let report = self.reconcile(&mut doc)?;

        let reconciled: Cow<'_, [u8]> = if report.is_unchanged() {
            tracing::trace!("SDI versions match, deserializing as is");
            Cow::Borrowed(sdi)
        } else {
            Cow::Owned(doc.render(Layout::Compact, 0)?.into_bytes())
        };

        self.dictionary.deserialize(&reconciled)
    }

    /// Serializes `table`, owned by `schema_name`, to compact SDI.
    ///
    /// # Errors
    ///
    /// - structural mismatch: the table cannot be represented
    /// - internal invariant violation: invariant checks are enabled and the output
    ///   is not canonical
    pub fn serialize(&self, table: &Table, schema_name: &str) -> Result<String> {
        let sdi = self.dictionary.serialize(table, schema_name)?;
        if self.options.enable_invariant_checks {
            self.check_canonical(&sdi)?;
        }
        Ok(sdi)
    }

    fn check_canonical(&self, sdi: &str) -> Result<()> {
        let canonical = self.minify(sdi.as_bytes())?;
        if canonical == sdi {
            return Ok(());
        }
        tracing::error!(
            produced = sdi,
            canonical = %canonical,
            "dictionary emitted SDI that is not in compact form"
        );
        Err(Error::InternalInvariantViolation {
            produced: sdi.to_string(),
            canonical,
        })
    }
}
