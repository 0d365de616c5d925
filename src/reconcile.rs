//! Version reconciliation for incoming SDI documents.
//!
//! The dictionary deserializer is strict about `sdi_version` and `dd_version`, so
//! an SDI written by an older or newer server would be rejected purely for its
//! version numbers. [`Reconciler`] rewrites those two fields to the running
//! system's [`CanonicalVersions`] before the document reaches the dictionary. Any
//! other incompatibility still surfaces downstream.

use crate::dictionary::CanonicalVersions;
use crate::document::SdiDocument;
use crate::error::Result;

/// Name of the SDI format version field.
pub const SDI_VERSION_FIELD: &str = "sdi_version";
/// Name of the dictionary schema version field.
pub const DD_VERSION_FIELD: &str = "dd_version";

/// What happened to one version field during reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldChange<T> {
    /// The field already held the canonical value.
    Unchanged(T),
    /// The field was overwritten in place.
    Rewritten { from: T, to: T },
}

impl<T: Copy> FieldChange<T> {
    /// Value of the field after reconciliation.
    pub fn current(&self) -> T {
        match *self {
            FieldChange::Unchanged(v) | FieldChange::Rewritten { to: v, .. } => v,
        }
    }

    /// Value of the field as it arrived.
    pub fn original(&self) -> T {
        match *self {
            FieldChange::Unchanged(v) | FieldChange::Rewritten { from: v, .. } => v,
        }
    }

    /// Returns `true` if reconciliation wrote this field.
    #[must_use]
    pub const fn is_rewritten(&self) -> bool {
        matches!(self, FieldChange::Rewritten { .. })
    }
}

/// Report of a single [`Reconciler::reconcile`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub sdi_version: FieldChange<u64>,
    pub dd_version: FieldChange<u32>,
}

impl Reconciliation {
    /// Returns `true` when no field was written.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        !self.sdi_version.is_rewritten() && !self.dd_version.is_rewritten()
    }
}

/// Rewrites SDI version fields to a fixed canonical pair.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::{CanonicalVersions, Reconciler, SdiDocument};
///
/// let reconciler = Reconciler::new(CanonicalVersions::new(2, 80800));
/// let mut doc =
///     SdiDocument::parse(br#"{"sdi_version":1,"dd_version":80700,"name":"t1"}"#).unwrap();
///
/// let report = reconciler.reconcile(&mut doc).unwrap();
/// assert!(!report.is_unchanged());
/// assert_eq!(doc.u64_field("sdi_version").unwrap(), 2);
/// assert_eq!(doc.u32_field("dd_version").unwrap(), 80800);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconciler {
    versions: CanonicalVersions,
}

impl Reconciler {
    /// Creates a reconciler that rewrites documents to `versions`.
    #[must_use]
    pub const fn new(versions: CanonicalVersions) -> Self {
        Reconciler { versions }
    }

    /// The pair every reconciled document ends up carrying.
    #[must_use]
    pub const fn versions(&self) -> CanonicalVersions {
        self.versions
    }

    /// Brings both version fields of `doc` to the canonical pair.
    ///
    /// Both fields are read before either is written, so a failure leaves `doc`
    /// untouched. A document that already matches is not written at all.
    ///
    /// # Errors
    ///
    /// Returns a malformed-document error if the root is not an object or either
    /// field is absent, not an unsigned integer, or too wide for its type.
    pub fn reconcile(&self, doc: &mut SdiDocument) -> Result<Reconciliation> {
        let sdi_version = doc.u64_field(SDI_VERSION_FIELD)?;
        let dd_version = doc.u32_field(DD_VERSION_FIELD)?;

        let sdi_change = if sdi_version == self.versions.sdi_version {
            FieldChange::Unchanged(sdi_version)
        } else {
            doc.set_u64_field(SDI_VERSION_FIELD, self.versions.sdi_version)?;
            tracing::debug!(
                from = sdi_version,
                to = self.versions.sdi_version,
                "rewrote sdi_version"
            );
            FieldChange::Rewritten {
                from: sdi_version,
                to: self.versions.sdi_version,
            }
        };

        let dd_change = if dd_version == self.versions.dd_version {
            FieldChange::Unchanged(dd_version)
        } else {
            doc.set_u32_field(DD_VERSION_FIELD, self.versions.dd_version)?;
            tracing::debug!(
                from = dd_version,
                to = self.versions.dd_version,
                "rewrote dd_version"
            );
            FieldChange::Rewritten {
                from: dd_version,
                to: self.versions.dd_version,
            }
        };

        Ok(Reconciliation {
            sdi_version: sdi_change,
            dd_version: dd_change,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Reconciler::new(CanonicalVersions::default())
    }
}
