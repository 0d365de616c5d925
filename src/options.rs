//! Configuration options for SDI rendering and serialization.
//!
//! - [`SdiOptions`]: main configuration struct
//! - [`Layout`]: compact (stored) or pretty (diagnostic) rendering
//!
//! ## Examples
//!
//! ```rust
//! use sdi_codec::{SdiCodec, SdiOptions};
//!
//! // Two-space pretty output, self-check always on
//! let options = SdiOptions::new()
//!     .with_indent(2)
//!     .with_invariant_checks(true);
//! let codec = SdiCodec::new(options);
//!
//! let pretty = codec.prettify(br#"{"a":1}"#).unwrap();
//! assert_eq!(pretty, "{\n  \"a\": 1\n}");
//! ```

/// Rendering layout for an SDI document.
///
/// - **Compact**: no insignificant whitespace; the only form that is ever stored
/// - **Pretty**: newlines and indentation, for humans and tooling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Compact,
    Pretty,
}

/// Configuration options for an [`SdiCodec`](crate::SdiCodec).
#[derive(Clone, Debug)]
pub struct SdiOptions {
    /// Spaces per nesting level in [`Layout::Pretty`] output.
    pub indent: usize,
    /// Run the canonical-form self-check on every serialized SDI.
    pub enable_invariant_checks: bool,
}

impl Default for SdiOptions {
    fn default() -> Self {
        SdiOptions {
            indent: 4,
            enable_invariant_checks: cfg!(debug_assertions),
        }
    }
}

impl SdiOptions {
    /// Creates default options (4-space pretty indent, self-check in debug builds).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdi_codec::SdiOptions;
    ///
    /// let options = SdiOptions::new();
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size used by pretty rendering.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables the canonical-form self-check at serialize time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdi_codec::SdiOptions;
    ///
    /// let production = SdiOptions::new().with_invariant_checks(false);
    /// assert!(!production.enable_invariant_checks);
    /// ```
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.enable_invariant_checks = enabled;
        self
    }
}
