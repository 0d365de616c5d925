//! Error types for SDI parsing, reconciliation and (de)serialization.
//!
//! Every failure falls into one of three classes, reported by [`Error::kind`]:
//!
//! - **Malformed documents**: input that is not JSON, or whose version fields are
//!   missing or not unsigned integers of the right width
//! - **Structural mismatches**: documents whose versions were reconciled but whose
//!   content the dictionary still cannot interpret
//! - **Internal invariant violations**: serialized output that is not in canonical
//!   (compact) form, which points at a defect in the producer rather than the caller
//!
//! A version mismatch is never an error. It is the case the reconciler exists to absorb.
//!
//! ## Examples
//!
//! ```rust
//! use sdi_codec::{prettify, ErrorKind};
//!
//! let err = prettify(b"{not json").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MalformedDocument);
//! assert!(err.to_string().contains("line 1"));
//! ```

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input does not parse, or its version fields are absent or mistyped.
    MalformedDocument,
    /// The dictionary rejected the document after version reconciliation.
    StructuralMismatch,
    /// Serialized output failed the canonical-form self-check.
    InternalInvariantViolation,
}

/// Represents all possible errors raised while handling SDI documents.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input is not a well-formed JSON document.
    #[error("Syntax error at line {line}, column {column}: {msg}")]
    Syntax {
        line: usize,
        column: usize,
        msg: String,
    },

    /// The document root is not a JSON object.
    #[error("SDI document root must be an object, found {found}")]
    NotAnObject { found: &'static str },

    /// A required field is absent.
    #[error("Missing field `{field}`")]
    MissingField { field: String },

    /// A field is present but holds the wrong kind of value.
    #[error("Invalid field `{field}`: expected {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The dictionary could not interpret the (reconciled) document.
    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    /// Serialized output is not byte-identical to its own compact rendering.
    #[error("SDI is not in canonical form\nproduced:  {produced}\ncanonical: {canonical}")]
    InternalInvariantViolation { produced: String, canonical: String },

    /// The document could not be rendered back to text.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Creates a syntax error from a position and message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdi_codec::Error;
    ///
    /// let err = Error::syntax(3, 7, "expected `:`");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, column: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates a missing-field error.
    pub fn missing_field(field: &str) -> Self {
        Error::MissingField {
            field: field.to_string(),
        }
    }

    /// Creates an invalid-field error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdi_codec::Error;
    ///
    /// let err = Error::invalid_field("dd_version", "u32", "-1");
    /// assert!(err.to_string().contains("expected u32"));
    /// ```
    pub fn invalid_field(field: &str, expected: &'static str, found: &str) -> Self {
        Error::InvalidField {
            field: field.to_string(),
            expected,
            found: found.to_string(),
        }
    }

    /// Creates a structural-mismatch error with a display message.
    pub fn structural<T: std::fmt::Display>(msg: T) -> Self {
        Error::StructuralMismatch(msg.to_string())
    }

    /// Classifies this error into the three SDI failure classes.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. }
            | Error::NotAnObject { .. }
            | Error::MissingField { .. }
            | Error::InvalidField { .. }
            | Error::Render(_) => ErrorKind::MalformedDocument,
            Error::StructuralMismatch(_) => ErrorKind::StructuralMismatch,
            Error::InternalInvariantViolation { .. } => ErrorKind::InternalInvariantViolation,
        }
    }

    /// Returns `true` for errors caused by unparseable input or bad version fields.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self.kind(), ErrorKind::MalformedDocument)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                Error::syntax(err.line(), err.column(), &err.to_string())
            }
            serde_json::error::Category::Io => Error::Render(err.to_string()),
            serde_json::error::Category::Data => Error::structural(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::missing_field("sdi_version").kind(),
            ErrorKind::MalformedDocument
        );
        assert_eq!(
            Error::structural("bad column").kind(),
            ErrorKind::StructuralMismatch
        );
        let violation = Error::InternalInvariantViolation {
            produced: "{ }".to_string(),
            canonical: "{}".to_string(),
        };
        assert_eq!(violation.kind(), ErrorKind::InternalInvariantViolation);
        assert!(!violation.is_malformed());
    }

    #[test]
    fn test_from_json_syntax_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.is_malformed());
        assert!(matches!(err, Error::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_from_json_data_error() {
        let json_err = serde_json::from_str::<u32>("\"text\"").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), ErrorKind::StructuralMismatch);
    }
}
