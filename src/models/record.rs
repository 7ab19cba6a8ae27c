//! Generic record model
//!
//! A [`Record`] is an ordered mapping from field name to a scalar
//! [`FieldValue`], always keyed by a positive integer id. The store operates on
//! this shape only; typed entities convert into it.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Identifier of a record within its collection
pub type RecordId = u64;

/// Name of the key field every record carries
pub const ID_FIELD: &str = "id";

/// A scalar field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Borrow the text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as a number; numeric text is accepted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Read the value as a boolean; `true`/`false` text is accepted
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// A partial set of field values to merge into a record
///
/// An `id` entry is never applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    entries: Vec<(String, FieldValue)>,
}

impl Patch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the patch (builder style)
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a field to the patch, replacing an earlier entry for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One stored entity: an id plus ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create a record with no fields besides its id
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Get a field value by name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a field rendered as text, or an empty string when absent
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Set a field, overwriting in place or appending a new key
    ///
    /// Returns `false` (and does nothing) for the `id` key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let key = key.into();
        if key == ID_FIELD {
            return false;
        }
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
        true
    }

    /// Merge a patch into this record
    pub fn apply(&mut self, patch: &Patch) {
        for (key, value) in patch.iter() {
            self.set(key, value.clone());
        }
    }

    /// Field names in order, starting with `id`
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(ID_FIELD).chain(self.fields.iter().map(|(k, _)| k.as_str()))
    }

    /// Non-id fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields including `id`
    pub fn field_count(&self) -> usize {
        self.fields.len() + 1
    }

    /// String form of every value, `id` first, matching [`Record::keys`]
    pub fn string_values(&self) -> Vec<String> {
        std::iter::once(self.id.to_string())
            .chain(self.fields.iter().map(|(_, v)| v.to_string()))
            .collect()
    }

    /// Whether any value's lowercase string form contains `needle_lower`
    pub fn contains_lowercase(&self, needle_lower: &str) -> bool {
        self.string_values()
            .iter()
            .any(|v| v.to_lowercase().contains(needle_lower))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_count()))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Stored id, tolerating the numeric strings older files contain
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar fields with a positive integer `id`")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Record, A::Error> {
                let mut id = None;
                let mut fields: Vec<(String, FieldValue)> = Vec::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == ID_FIELD {
                        if id.is_some() {
                            return Err(de::Error::duplicate_field("id"));
                        }
                        let parsed = match map.next_value::<RawId>()? {
                            RawId::Number(n) => n,
                            RawId::Text(s) => s.trim().parse::<u64>().map_err(|_| {
                                de::Error::custom(format!("invalid id {:?}", s))
                            })?,
                        };
                        if parsed == 0 {
                            return Err(de::Error::custom("id must be positive"));
                        }
                        id = Some(parsed);
                    } else {
                        if fields.iter().any(|(k, _)| *k == key) {
                            return Err(de::Error::custom(format!("duplicate field `{}`", key)));
                        }
                        let value = map.next_value::<FieldValue>()?;
                        fields.push((key, value));
                    }
                }

                let id = id.ok_or_else(|| de::Error::missing_field("id"))?;
                Ok(Record { id, fields })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
