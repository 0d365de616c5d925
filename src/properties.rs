//! Ordered `key=value;` property bags.
//!
//! The dictionary stores option sets and engine-private data as a single string of
//! `key=value;` pairs, for example `"pack_record=1;stats_auto_recalc=0;"`. Inside
//! keys and values, `=`, `;` and `\` are escaped with a backslash.
//!
//! [`Properties`] wraps an [`IndexMap`] so pairs keep their original order. A
//! canonically escaped string (every `=`, `;` and `\` inside a key or value
//! escaped) encodes back byte-for-byte. A value holding a bare `=` parses, but
//! encodes with that `=` escaped. Keys are unique: a repeated key is an error
//! rather than a silent overwrite.
//!
//! ## Examples
//!
//! ```rust
//! use sdi_codec::Properties;
//!
//! let props: Properties = "key_block_size=0;pack_record=1;".parse().unwrap();
//! assert_eq!(props.get("pack_record"), Some("1"));
//! assert_eq!(props.to_string(), "key_block_size=0;pack_record=1;");
//! ```

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An ordered map of property names to string values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Properties(IndexMap<String, String>);

/// Error returned when a property string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertiesError {
    #[error("property `{0}` has no `=` separator")]
    MissingSeparator(String),
    #[error("property string ends inside an escape sequence")]
    DanglingEscape,
    #[error("property string is not terminated by `;`")]
    Unterminated,
    #[error("property `{0}` appears more than once")]
    DuplicateKey(String),
}

impl Properties {
    /// Creates an empty property bag.
    #[must_use]
    pub fn new() -> Self {
        Properties(IndexMap::new())
    }

    /// Sets a property, returning the previous value if any.
    ///
    /// An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes a property, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        if matches!(c, '=' | ';' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (key, value) in &self.0 {
            escape_into(&mut out, key);
            out.push('=');
            escape_into(&mut out, value);
            out.push(';');
        }
        f.write_str(&out)
    }
}

impl FromStr for Properties {
    type Err = PropertiesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = IndexMap::new();
        let mut key: Option<String> = None;
        let mut current = String::new();
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => current.push(chars.next().ok_or(PropertiesError::DanglingEscape)?),
                '=' if key.is_none() => key = Some(std::mem::take(&mut current)),
                ';' => {
                    let k = key
                        .take()
                        .ok_or_else(|| PropertiesError::MissingSeparator(current.clone()))?;
                    match map.entry(k) {
                        Entry::Occupied(entry) => {
                            return Err(PropertiesError::DuplicateKey(entry.key().clone()))
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(std::mem::take(&mut current));
                        }
                    }
                }
                other => current.push(other),
            }
        }

        if key.is_some() || !current.is_empty() {
            return Err(PropertiesError::Unterminated);
        }
        Ok(Properties(map))
    }
}

impl Serialize for Properties {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a `key=value;` property string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PropertiesVisitor)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Properties(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
