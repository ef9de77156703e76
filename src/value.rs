//! The host-facing value model
//!
//! [`Value`] is what a caller hands to [`crate::encode`]: fully owned, unbounded
//! precision where the wire format allows it. [`Item`] is what [`crate::decode`]
//! hands back: it borrows byte and list payloads from the source buffer, and
//! only allocates where the wire format forces a transcode (string payloads,
//! and the decimal/integer big-integer forms).

use std::fmt;
use std::ops::Index;

use num_bigint::BigInt;
use ordered_float::OrderedFloat;

use crate::decimal::Decimal;

/// Distinguishes a plain string payload from one tagged as an object
/// reference (tags 25/26). The codec round-trips the distinction faithfully
/// but assigns it no further meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// Tags 1 (ASCII) / 2 (UNICODE)
    Text,
    /// Tags 25 (OREF_ASCII) / 26 (OREF_UNICODE)
    ObjectReference,
}

/// An owned value ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The UNDEF form: an unassigned slot, distinct from [`Value::Null`].
    Undef,
    /// The null/placeholder form.
    Null {
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// Raw byte payload, tagged ASCII.
    Bytes {
        /// The payload bytes.
        bytes: Vec<u8>,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// Text, run through the three-tier encoding ladder on encode.
    String {
        /// The text to encode.
        text: String,
        /// Whether this is a plain string or an object reference.
        kind: StringKind,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// An arbitrary-precision signed integer.
    Integer {
        /// The integer value.
        value: BigInt,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// An arbitrary-precision scaled decimal.
    Decimal {
        /// The decimal value.
        value: Decimal,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// An IEEE-754 double.
    Float {
        /// The float value.
        value: OrderedFloat<f64>,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
    /// A nested `$LIST`.
    List {
        /// The child values.
        items: Vec<Value>,
        /// Whether to set the by-reference bit on the tag byte.
        by_reference: bool,
    },
}

impl Value {
    /// A plain text value with the default (non-reference) framing.
    pub fn text(text: impl Into<String>) -> Self {
        Value::String {
            text: text.into(),
            kind: StringKind::Text,
            by_reference: false,
        }
    }

    /// An integer value with the default (non-reference) framing.
    pub fn int(value: impl Into<BigInt>) -> Self {
        Value::Integer {
            value: value.into(),
            by_reference: false,
        }
    }

    /// A float value with the default (non-reference) framing.
    pub fn float(value: f64) -> Self {
        Value::Float {
            value: OrderedFloat(value),
            by_reference: false,
        }
    }

    /// A nested-list value with the default (non-reference) framing.
    pub fn list(items: impl Into<Vec<Value>>) -> Self {
        Value::List {
            items: items.into(),
            by_reference: false,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::text(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::text(text)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Undef | Value::Null { .. } => write!(f, "\"\""),
        Value::Bytes { bytes, .. } => write!(f, "{bytes:?}"),
        Value::String { text, .. } => write!(f, "{text:?}"),
        Value::Integer { value, .. } => write!(f, "{value}"),
        Value::Decimal { value, .. } => write!(f, "{value}"),
        Value::Float { value, .. } => write!(f, "{value}"),
        Value::List { items, .. } => {
            write!(f, "$lb(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_value(f, item)?;
            }
            write!(f, ")")
        }
    }
}

/// A decoded value, borrowing byte payloads from the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'de> {
    /// The UNDEF form: an unassigned slot, distinct from [`Item::Null`].
    Undef,
    /// The null/placeholder form.
    Null {
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// Raw byte payload that did not decode as a string or nested list.
    Bytes {
        /// The borrowed payload bytes.
        bytes: &'de [u8],
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// Decoded text.
    String {
        /// The decoded text.
        text: String,
        /// Whether this was tagged as a plain string or an object reference.
        kind: StringKind,
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// An arbitrary-precision signed integer.
    Integer {
        /// The integer value.
        value: BigInt,
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// An arbitrary-precision scaled decimal.
    Decimal {
        /// The decimal value.
        value: Decimal,
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// An IEEE-754 double.
    Float {
        /// The float value.
        value: OrderedFloat<f64>,
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
    /// A nested `$LIST`, recognized by speculative re-parse.
    List {
        /// The child items.
        items: Vec<Item<'de>>,
        /// Whether the by-reference bit was set on the tag byte.
        by_reference: bool,
    },
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_item(f, self)
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &Item<'_>) -> fmt::Result {
    match item {
        Item::Undef | Item::Null { .. } => write!(f, "\"\""),
        Item::Bytes { bytes, .. } => write!(f, "{bytes:?}"),
        Item::String { text, .. } => write!(f, "{text:?}"),
        Item::Integer { value, .. } => write!(f, "{value}"),
        Item::Decimal { value, .. } => write!(f, "{value}"),
        Item::Float { value, .. } => write!(f, "{value}"),
        Item::List { items, .. } => {
            write!(f, "$lb(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_item(f, item)?;
            }
            write!(f, ")")
        }
    }
}

/// A decoded `$LIST`: the top-level sequence [`crate::decode`] returns.
///
/// Wraps `Vec<Item<'de>>` with indexed access, iteration, concatenation and
/// the `$lb(...)` pretty-printer described in the wire format documentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List<'de> {
    items: Vec<Item<'de>>,
}

impl<'de> List<'de> {
    /// Wrap an already-decoded sequence of items.
    pub fn new(items: Vec<Item<'de>>) -> Self {
        Self { items }
    }

    /// Number of top-level items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the item at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Item<'de>> {
        self.items.get(index)
    }

    /// Iterate over the top-level items.
    pub fn iter(&self) -> std::slice::Iter<'_, Item<'de>> {
        self.items.iter()
    }

    /// Append another list's items, consuming both.
    pub fn concat(mut self, other: List<'de>) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Unwrap into the underlying vector.
    pub fn into_vec(self) -> Vec<Item<'de>> {
        self.items
    }
}

impl<'de> Index<usize> for List<'de> {
    type Output = Item<'de>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'de> IntoIterator for List<'de> {
    type Item = Item<'de>;
    type IntoIter = std::vec::IntoIter<Item<'de>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, 'de> IntoIterator for &'a List<'de> {
    type Item = &'a Item<'de>;
    type IntoIter = std::slice::Iter<'a, Item<'de>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$lb(")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write_item(f, item)?;
        }
        write!(f, ")")
    }
}
