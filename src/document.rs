//! Owned, order-preserving SDI document tree.
//!
//! [`SdiDocument`] wraps a [`serde_json::Value`] built with the `preserve_order`
//! feature, so object fields keep their input order through parse, in-place edits
//! and render. Field access by name is total: a missing or mistyped field is an
//! [`Error`], never a panic.
//!
//! ## Examples
//!
//! ```rust
//! use sdi_codec::{Layout, SdiDocument};
//!
//! let mut doc = SdiDocument::parse(br#"{ "sdi_version": 1, "name": "t1" }"#).unwrap();
//! assert_eq!(doc.u64_field("sdi_version").unwrap(), 1);
//!
//! doc.set_u64_field("sdi_version", 80019).unwrap();
//! assert_eq!(
//!     doc.render(Layout::Compact, 0).unwrap(),
//!     r#"{"sdi_version":80019,"name":"t1"}"#
//! );
//! ```

use crate::error::{Error, Result};
use crate::options::Layout;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

/// A parsed SDI document, exclusively owned by the call that created it.
#[derive(Clone, Debug, PartialEq)]
pub struct SdiDocument(Value);

impl SdiDocument {
    /// Parses UTF-8 JSON bytes into a document tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] if the bytes are not a single well-formed JSON value.
    pub fn parse(sdi: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(sdi)?;
        Ok(SdiDocument(value))
    }

    /// Wraps an already-built tree.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        SdiDocument(value)
    }

    /// Returns the underlying tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document, returning the underlying tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Renders the tree as text.
    ///
    /// `indent` is the number of spaces per level and only applies to [`Layout::Pretty`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the serializer fails.
    pub fn render(&self, layout: Layout, indent: usize) -> Result<String> {
        let buf = match layout {
            Layout::Compact => serde_json::to_vec(&self.0)?,
            Layout::Pretty => {
                let indent = b" ".repeat(indent);
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(&indent);
                serde::Serialize::serialize(
                    &self.0,
                    &mut Serializer::with_formatter(&mut buf, formatter),
                )?;
                buf
            }
        };
        String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
    }

    /// Reads a top-level unsigned 64-bit integer field.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAnObject`] if the root is not an object
    /// - [`Error::MissingField`] if the field is absent
    /// - [`Error::InvalidField`] if the value is not a non-negative integer
    pub fn u64_field(&self, name: &str) -> Result<u64> {
        let value = self.field(name)?;
        value
            .as_u64()
            .ok_or_else(|| Error::invalid_field(name, "unsigned 64-bit integer", &describe(value)))
    }

    /// Reads a top-level unsigned 32-bit integer field.
    ///
    /// # Errors
    ///
    /// As [`SdiDocument::u64_field`], and [`Error::InvalidField`] if the value
    /// does not fit in 32 bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdi_codec::SdiDocument;
    ///
    /// let doc = SdiDocument::parse(br#"{"dd_version":4294967296}"#).unwrap();
    /// assert!(doc.u32_field("dd_version").is_err());
    /// ```
    pub fn u32_field(&self, name: &str) -> Result<u32> {
        let value = self.field(name)?;
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| Error::invalid_field(name, "unsigned 32-bit integer", &describe(value)))
    }

    /// Overwrites an existing top-level field with an unsigned 64-bit integer.
    ///
    /// The field keeps its position. Absent fields are never created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnObject`] or [`Error::MissingField`].
    pub fn set_u64_field(&mut self, name: &str, value: u64) -> Result<()> {
        *self.field_mut(name)? = Value::from(value);
        Ok(())
    }

    /// Overwrites an existing top-level field with an unsigned 32-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnObject`] or [`Error::MissingField`].
    pub fn set_u32_field(&mut self, name: &str, value: u32) -> Result<()> {
        *self.field_mut(name)? = Value::from(value);
        Ok(())
    }

    fn object(&self) -> Result<&Map<String, Value>> {
        self.0.as_object().ok_or(Error::NotAnObject {
            found: kind_name(&self.0),
        })
    }

    fn field(&self, name: &str) -> Result<&Value> {
        self.object()?
            .get(name)
            .ok_or_else(|| Error::missing_field(name))
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Value> {
        let found = kind_name(&self.0);
        self.0
            .as_object_mut()
            .ok_or(Error::NotAnObject { found })?
            .get_mut(name)
            .ok_or_else(|| Error::missing_field(name))
    }
}

impl From<SdiDocument> for Value {
    fn from(doc: SdiDocument) -> Self {
        doc.0
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => kind_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        let err = SdiDocument::parse(b"{not json").unwrap_err();
        assert!(err.is_malformed());
        assert!(SdiDocument::parse(b"").is_err());
        assert!(SdiDocument::parse(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_render_preserves_field_order() {
        let doc = SdiDocument::parse(br#"{"z":1,"a":{"y":true,"b":null},"m":[1,2]}"#).unwrap();
        assert_eq!(
            doc.render(Layout::Compact, 4).unwrap(),
            r#"{"z":1,"a":{"y":true,"b":null},"m":[1,2]}"#
        );
    }

    #[test]
    fn test_render_pretty_uses_indent() {
        let doc = SdiDocument::parse(br#"{"a":{"b":1}}"#).unwrap();
        assert_eq!(
            doc.render(Layout::Pretty, 4).unwrap(),
            "{\n    \"a\": {\n        \"b\": 1\n    }\n}"
        );
    }

    #[test]
    fn test_numeric_field_kinds() {
        let doc = SdiDocument::parse(
            br#"{"neg":-1,"frac":1.5,"text":"7","big":18446744073709551615,"wide":4294967296}"#,
        )
        .unwrap();

        assert!(matches!(
            doc.u64_field("neg"),
            Err(Error::InvalidField { ref found, .. }) if found == "-1"
        ));
        assert!(doc.u64_field("frac").is_err());
        assert!(doc.u64_field("text").is_err());
        assert_eq!(doc.u64_field("big").unwrap(), u64::MAX);
        assert!(doc.u32_field("wide").is_err());
        assert_eq!(doc.u64_field("wide").unwrap(), 4_294_967_296);
        assert!(matches!(
            doc.u64_field("absent"),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn test_non_object_root() {
        let mut doc = SdiDocument::parse(b"[1,2,3]").unwrap();
        assert!(matches!(
            doc.u64_field("sdi_version"),
            Err(Error::NotAnObject { found: "array" })
        ));
        assert!(doc.set_u64_field("sdi_version", 1).is_err());
    }

    #[test]
    fn test_set_keeps_position_and_never_inserts() {
        let mut doc = SdiDocument::parse(br#"{"a":1,"dd_version":5,"z":2}"#).unwrap();
        doc.set_u32_field("dd_version", 80023).unwrap();
        assert_eq!(
            doc.render(Layout::Compact, 0).unwrap(),
            r#"{"a":1,"dd_version":80023,"z":2}"#
        );
        assert!(doc.set_u32_field("missing", 1).is_err());
        assert_eq!(doc.as_value().as_object().map(Map::len), Some(3));
    }
}
