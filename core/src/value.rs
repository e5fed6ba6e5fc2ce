//! Representation of values of DICOM data elements.
//!
//! A primitive value holds either raw bytes
//! (for binary value representations and unparsed content)
//! or the list of strings decoded through the active character set.
//! Sequence values hold an owned list of nested data sets,
//! which makes the full data set a strict tree.

use crate::header::{HasLength, Length};
use crate::C;
use smallvec::smallvec;
use std::borrow::Cow;

/// A primitive (non-sequence) DICOM value.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// No value: the element is present but carries zero bytes of data.
    Empty,
    /// One or more decoded string values.
    /// Multiple values were delimited by a backslash in the source data.
    Strs(C<String>),
    /// A raw byte buffer, kept in the source byte order.
    Bytes(Vec<u8>),
}

impl From<&str> for PrimitiveValue {
    fn from(s: &str) -> PrimitiveValue {
        PrimitiveValue::Strs(smallvec![s.to_owned()])
    }
}

impl From<String> for PrimitiveValue {
    fn from(s: String) -> PrimitiveValue {
        PrimitiveValue::Strs(smallvec![s])
    }
}

impl PrimitiveValue {
    /// The number of individual values.
    pub fn multiplicity(&self) -> usize {
        match self {
            PrimitiveValue::Empty => 0,
            PrimitiveValue::Strs(s) => s.len(),
            PrimitiveValue::Bytes(_) => 1,
        }
    }

    /// The number of bytes the value would occupy on disk
    /// once encoded in the default character repertoire,
    /// before even-length padding.
    pub fn byte_len(&self) -> usize {
        match self {
            PrimitiveValue::Empty => 0,
            PrimitiveValue::Bytes(b) => b.len(),
            PrimitiveValue::Strs(s) => {
                if s.is_empty() {
                    0
                } else {
                    s.iter().map(|v| v.len()).sum::<usize>() + s.len() - 1
                }
            }
        }
    }

    /// Retrieve the value as a single string.
    /// Multiple values are joined by a backslash.
    /// Byte values are not converted.
    pub fn to_str(&self) -> Option<Cow<str>> {
        match self {
            PrimitiveValue::Empty => Some(Cow::Borrowed("")),
            PrimitiveValue::Strs(s) if s.len() == 1 => Some(Cow::Borrowed(&s[0])),
            PrimitiveValue::Strs(s) => Some(Cow::Owned(s.join("\\"))),
            PrimitiveValue::Bytes(_) => None,
        }
    }

    /// Retrieve the individual string values.
    pub fn strings(&self) -> Option<&[String]> {
        match self {
            PrimitiveValue::Strs(s) => Some(s),
            _ => None,
        }
    }

    /// Retrieve the raw bytes of the value.
    /// String values are not converted.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PrimitiveValue::Empty => Some(&[]),
            PrimitiveValue::Bytes(b) => Some(b),
            PrimitiveValue::Strs(_) => None,
        }
    }

    /// Parse the first string value as a decimal integer,
    /// as defined for the IS value representation.
    pub fn to_int(&self) -> Option<i64> {
        self.first_str().and_then(|s| s.trim().parse::<i64>().ok())
    }

    /// Parse the first string value as a decimal number,
    /// as defined for the DS value representation.
    pub fn to_float(&self) -> Option<f64> {
        self.first_str().and_then(|s| s.trim().parse::<f64>().ok())
    }

    fn first_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::Strs(s) => s.first().map(String::as_str),
            _ => None,
        }
    }
}

impl HasLength for PrimitiveValue {
    fn length(&self) -> Length {
        Length((self.byte_len() + self.byte_len() % 2) as u32)
    }
}

/// A full DICOM value,
/// which may be either primitive
/// or a sequence of items of type `I` (nested data sets).
#[derive(Debug, Clone, PartialEq)]
pub enum Value<I> {
    /// Primitive value.
    Primitive(PrimitiveValue),
    /// A sequence of nested data sets.
    /// The length may be undefined in the source encoding.
    Sequence {
        /// Sequence items, in source order.
        items: C<I>,
        /// The length of the sequence in bytes as encoded in the source
        /// (can be undefined).
        len: Length,
    },
}

impl<I> Value<I> {
    /// Create an empty primitive value.
    pub fn empty() -> Value<I> {
        Value::Primitive(PrimitiveValue::Empty)
    }

    /// Whether this value is a sequence of items.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence { .. })
    }

    /// Retrieve the primitive value, if it is one.
    pub fn primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Retrieve the sequence items, if this value is a sequence.
    pub fn items(&self) -> Option<&[I]> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Retrieve a mutable reference to the sequence items.
    pub fn items_mut(&mut self) -> Option<&mut C<I>> {
        match self {
            Value::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }
}

impl<I> From<PrimitiveValue> for Value<I> {
    fn from(v: PrimitiveValue) -> Value<I> {
        Value::Primitive(v)
    }
}

impl<I> HasLength for Value<I> {
    fn length(&self) -> Length {
        match self {
            Value::Primitive(v) => v.length(),
            Value::Sequence { len, .. } => *len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_string_join() {
        let v = PrimitiveValue::Strs(smallvec!["DERIVED".to_owned(), "PRIMARY".to_owned()]);
        assert_eq!(v.to_str().unwrap(), "DERIVED\\PRIMARY");
        assert_eq!(v.multiplicity(), 2);
        // 7 + 1 + 7 = 15 data bytes, padded to 16 on disk
        assert_eq!(v.byte_len(), 15);
        assert_eq!(v.length(), Length(16));
    }

    #[test]
    fn single_string() {
        let v = PrimitiveValue::from("JOHN^DOE");
        assert_eq!(v.to_str().unwrap(), "JOHN^DOE");
        assert_eq!(v.length(), Length(8));
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(PrimitiveValue::from(" 42 ").to_int(), Some(42));
        assert_eq!(PrimitiveValue::from("1.5").to_float(), Some(1.5));
        assert_eq!(PrimitiveValue::from("abc").to_int(), None);
        assert_eq!(PrimitiveValue::Bytes(vec![1, 2]).to_int(), None);
        assert_eq!(PrimitiveValue::Empty.to_float(), None);
    }

    #[test]
    fn byte_values() {
        let v = PrimitiveValue::Bytes(vec![0x10, 0x27]);
        assert_eq!(v.as_bytes(), Some(&[0x10, 0x27][..]));
        assert_eq!(v.to_str(), None);
        assert_eq!(v.length(), Length(2));
    }
}
