// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core data types for the tag bridge.
//!
//! This module provides the protocol-agnostic value model: tag identifiers,
//! the closed value taxonomy decoded from the wire, per-tag snapshot records,
//! and the ordered changeset handed to downstream consumers.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// A unique identifier for a tag (an OPC item ID).
///
/// Tag IDs are the fully-qualified item identifiers reported by the server
/// namespace, e.g. `Plant/Line1/Temperature`.
///
/// # Examples
///
/// ```
/// use dabridge_core::types::TagId;
///
/// let id = TagId::new("Plant/Line1/Temperature");
/// assert_eq!(id.as_str(), "Plant/Line1/Temperature");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Creates a new tag ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TagId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for TagId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Value Types
// =============================================================================

/// A decoded tag value.
///
/// This is the closed taxonomy every wire variant maps into. Values that the
/// decoder does not recognize arrive as [`TagValue::Fallback`] carrying a
/// stringified rendering; nothing read from the wire is ever dropped.
///
/// Equality is structural. Arrays compare element-wise, including length, so
/// changed array contents register as changes.
///
/// # Examples
///
/// ```
/// use dabridge_core::types::TagValue;
///
/// let temp = TagValue::Float64(25.5);
/// assert_eq!(temp.as_f64(), Some(25.5));
/// assert_eq!(temp.type_name(), "float64");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TagValue {
    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    Int8(i8),

    /// Signed 16-bit integer
    Int16(i16),

    /// Signed 32-bit integer
    Int32(i32),

    /// Signed 64-bit integer
    Int64(i64),

    /// Unsigned 8-bit integer
    UInt8(u8),

    /// Unsigned 16-bit integer
    UInt16(u16),

    /// Unsigned 32-bit integer
    UInt32(u32),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// UTF-8 string
    String(String),

    /// Date and time with timezone
    DateTime(DateTime<Utc>),

    /// Exact fixed-point currency amount
    Currency(Decimal),

    /// Array of already-decoded values
    Array(Vec<TagValue>),

    /// Array of currency amounts
    CurrencyArray(Vec<Decimal>),

    /// Array of strings
    StringArray(Vec<String>),

    /// Stringified rendering of a wire value the decoder does not recognize
    Fallback(String),
}

impl TagValue {
    /// Returns the type name of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use dabridge_core::types::TagValue;
    ///
    /// assert_eq!(TagValue::Float64(1.0).type_name(), "float64");
    /// assert_eq!(TagValue::Bool(true).type_name(), "bool");
    /// ```
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::Bool(_) => "bool",
            TagValue::Int8(_) => "int8",
            TagValue::Int16(_) => "int16",
            TagValue::Int32(_) => "int32",
            TagValue::Int64(_) => "int64",
            TagValue::UInt8(_) => "uint8",
            TagValue::UInt16(_) => "uint16",
            TagValue::UInt32(_) => "uint32",
            TagValue::Float32(_) => "float32",
            TagValue::Float64(_) => "float64",
            TagValue::String(_) => "string",
            TagValue::DateTime(_) => "datetime",
            TagValue::Currency(_) => "currency",
            TagValue::Array(_) => "array",
            TagValue::CurrencyArray(_) => "currency_array",
            TagValue::StringArray(_) => "string_array",
            TagValue::Fallback(_) => "fallback",
        }
    }

    /// Returns `true` if this is any array value.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TagValue::Array(_) | TagValue::CurrencyArray(_) | TagValue::StringArray(_)
        )
    }

    /// Attempts to convert this value to a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to convert this value to an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Bool(v) => Some(if *v { 1 } else { 0 }),
            TagValue::Int8(v) => Some(*v as i64),
            TagValue::Int16(v) => Some(*v as i64),
            TagValue::Int32(v) => Some(*v as i64),
            TagValue::Int64(v) => Some(*v),
            TagValue::UInt8(v) => Some(*v as i64),
            TagValue::UInt16(v) => Some(*v as i64),
            TagValue::UInt32(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Attempts to convert this value to an f64.
    ///
    /// Currency amounts convert lossily; use the [`Decimal`] directly when
    /// exactness matters.
    pub fn as_f64(&self) -> Option<f64> {
        use rust_decimal::prelude::ToPrimitive;

        match self {
            TagValue::Float32(v) => Some(*v as f64),
            TagValue::Float64(v) => Some(*v),
            TagValue::Currency(v) => v.to_f64(),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Attempts to get this value as a string reference.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(v) => Some(v),
            TagValue::Fallback(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(v) => write!(f, "{}", v),
            TagValue::Int8(v) => write!(f, "{}", v),
            TagValue::Int16(v) => write!(f, "{}", v),
            TagValue::Int32(v) => write!(f, "{}", v),
            TagValue::Int64(v) => write!(f, "{}", v),
            TagValue::UInt8(v) => write!(f, "{}", v),
            TagValue::UInt16(v) => write!(f, "{}", v),
            TagValue::UInt32(v) => write!(f, "{}", v),
            TagValue::Float32(v) => write!(f, "{}", v),
            TagValue::Float64(v) => write!(f, "{}", v),
            TagValue::String(v) => write!(f, "{}", v),
            TagValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            TagValue::Currency(v) => write!(f, "{}", v),
            TagValue::Array(v) => write!(f, "array[{}]", v.len()),
            TagValue::CurrencyArray(v) => write!(f, "currency_array[{}]", v.len()),
            TagValue::StringArray(v) => write!(f, "string_array[{}]", v.len()),
            TagValue::Fallback(v) => write!(f, "{}", v),
        }
    }
}

/// Implements From<T> for TagValue for primitive types.
macro_rules! impl_from_for_tag_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TagValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    TagValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_tag_value! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Decimal => Currency,
    DateTime<Utc> => DateTime,
}

impl From<&str> for TagValue {
    #[inline]
    fn from(v: &str) -> Self {
        TagValue::String(v.to_string())
    }
}

// =============================================================================
// Snapshot Records
// =============================================================================

/// Read metadata attached to a snapshot when the endpoint is not running in
/// values-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    /// Server-reported error code for the read.
    pub error_code: i32,
    /// OPC quality word.
    pub quality: i16,
    /// Server timestamp, wire-encoded as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp_epoch_millis: DateTime<Utc>,
}

/// One tag's state captured during a poll cycle.
///
/// In values-only mode the record carries just the value; otherwise the read
/// metadata is flattened alongside it, so the serialized form is
/// `{errorCode, quality, timestampEpochMillis, value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSnapshot {
    /// The decoded value.
    pub value: TagValue,
    /// Read metadata; `None` in values-only mode.
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SnapshotMeta>,
}

impl TagSnapshot {
    /// Creates a bare-value snapshot (values-only mode).
    #[inline]
    pub fn value_only(value: TagValue) -> Self {
        Self { value, meta: None }
    }

    /// Creates a snapshot with full read metadata.
    #[inline]
    pub fn with_meta(value: TagValue, meta: SnapshotMeta) -> Self {
        Self {
            value,
            meta: Some(meta),
        }
    }
}

// =============================================================================
// Changeset
// =============================================================================

/// An ordered collection of tag snapshots produced by one poll cycle.
///
/// Iteration order is the lexicographic order of the tag IDs, so downstream
/// consumers see a deterministic sequence regardless of read order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset(BTreeMap<TagId, TagSnapshot>);

impl Changeset {
    /// Creates an empty changeset.
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a snapshot, replacing any previous entry for the tag.
    pub fn insert(&mut self, tag: TagId, snapshot: TagSnapshot) -> Option<TagSnapshot> {
        self.0.insert(tag, snapshot)
    }

    /// Returns the snapshot for a tag, if present.
    pub fn get(&self, tag: &TagId) -> Option<&TagSnapshot> {
        self.0.get(tag)
    }

    /// Returns `true` if the changeset contains the tag.
    pub fn contains(&self, tag: &TagId) -> bool {
        self.0.contains_key(tag)
    }

    /// Iterates snapshots in tag order.
    pub fn iter(&self) -> btree_map::Iter<'_, TagId, TagSnapshot> {
        self.0.iter()
    }

    /// Number of tags in the changeset.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the changeset carries no tags.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Changeset {
    type Item = (TagId, TagSnapshot);
    type IntoIter = btree_map::IntoIter<TagId, TagSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = (&'a TagId, &'a TagSnapshot);
    type IntoIter = btree_map::Iter<'a, TagId, TagSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(TagId, TagSnapshot)> for Changeset {
    fn from_iter<I: IntoIterator<Item = (TagId, TagSnapshot)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tag_id_basics() {
        let id = TagId::new("Plant/Line1/Temperature");
        assert_eq!(id.as_str(), "Plant/Line1/Temperature");
        assert_eq!(id.to_string(), "Plant/Line1/Temperature");
        assert_eq!(TagId::from("a"), TagId::new("a"));
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(TagValue::Int8(-1).type_name(), "int8");
        assert_eq!(TagValue::Currency(Decimal::new(75, 1)).type_name(), "currency");
        assert_eq!(TagValue::Fallback("?".into()).type_name(), "fallback");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(TagValue::UInt16(42).as_i64(), Some(42));
        assert_eq!(TagValue::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(TagValue::Currency(Decimal::new(75, 1)).as_f64(), Some(7.5));
        assert_eq!(TagValue::String("x".into()).as_str(), Some("x"));
        assert!(TagValue::StringArray(vec![]).is_array());
    }

    #[test]
    fn test_array_equality_is_element_wise() {
        let a = TagValue::Array(vec![TagValue::Int32(1), TagValue::Int32(2)]);
        let b = TagValue::Array(vec![TagValue::Int32(1), TagValue::Int32(2)]);
        let c = TagValue::Array(vec![TagValue::Int32(1), TagValue::Int32(3)]);
        let d = TagValue::Array(vec![TagValue::Int32(1)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_values_only_snapshot_serialization() {
        let snapshot = TagSnapshot::value_only(TagValue::Float64(25.5));
        let json = serde_json::to_value(&snapshot).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("value"));
    }

    #[test]
    fn test_full_snapshot_serialization() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = TagSnapshot::with_meta(
            TagValue::Int32(7),
            SnapshotMeta {
                error_code: 0,
                quality: 192,
                timestamp_epoch_millis: ts,
            },
        );
        let json = serde_json::to_value(&snapshot).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj["errorCode"], 0);
        assert_eq!(obj["quality"], 192);
        assert_eq!(obj["timestampEpochMillis"], ts.timestamp_millis());
        assert!(obj.contains_key("value"));
    }

    #[test]
    fn test_changeset_is_ordered() {
        let mut changeset = Changeset::new();
        changeset.insert(TagId::new("b"), TagSnapshot::value_only(TagValue::Int32(2)));
        changeset.insert(TagId::new("a"), TagSnapshot::value_only(TagValue::Int32(1)));
        changeset.insert(TagId::new("c"), TagSnapshot::value_only(TagValue::Int32(3)));

        let keys: Vec<&str> = changeset.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_changeset_insert_replaces() {
        let mut changeset = Changeset::new();
        changeset.insert(TagId::new("a"), TagSnapshot::value_only(TagValue::Int32(1)));
        let previous =
            changeset.insert(TagId::new("a"), TagSnapshot::value_only(TagValue::Int32(2)));

        assert_eq!(previous.unwrap().value, TagValue::Int32(1));
        assert_eq!(changeset.len(), 1);
    }
}
