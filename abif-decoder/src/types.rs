//! Core types for the ABIF decoder library
//!
//! This module defines the tag key type, the decoded value enum that the
//! reader emits, and the error taxonomy. The decoder is read-only and
//! stateless apart from the directory index - every value lookup re-reads
//! and re-decodes from the source.

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, AbifError>;

/// A tag identifies one stored field in an ABIF file.
///
/// Tags combine a 4-byte name with a number, e.g. `PBAS:1` and `PBAS:2` are
/// distinct fields. The name is not required to be valid text; files in the
/// wild carry names like `FWO_`. Ordering is by name bytes, then number,
/// which is the conventional display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    /// 4-byte tag name
    pub name: [u8; 4],
    /// Tag number, distinguishing same-named fields
    pub num: i32,
}

impl Tag {
    /// Create a tag from a 4-byte name and a number
    pub fn new(name: [u8; 4], num: i32) -> Self {
        Self { name, num }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", String::from_utf8_lossy(&self.name), self.num)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error parsing a tag from its `NAME:NUM` text form
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid tag {0:?}: expected NAME:NUM with a 4-character name")]
pub struct TagParseError(String);

impl FromStr for Tag {
    type Err = TagParseError;

    /// Parse a tag from its display form, e.g. `"PBAS:1"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || TagParseError(s.to_string());
        let (name, num) = s.split_once(':').ok_or_else(err)?;
        let name: [u8; 4] = name.as_bytes().try_into().map_err(|_| err())?;
        let num = num.parse().map_err(|_| err())?;
        Ok(Tag { name, num })
    }
}

/// Legacy "thumbprint" file identifier (element type 12).
///
/// An opaque identifier from older files; the fields carry no semantics
/// here and are preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thumb {
    pub d: i32,
    pub u: i32,
    pub c: u8,
    pub n: u8,
}

impl fmt::Display for Thumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {} {})", self.d, self.u, self.c, self.n)
    }
}

/// A decoded value, keyed by element type and arity.
///
/// Fields with element count 1 decode to the scalar variants; counts above 1
/// decode to the sequence variants. The two string element types always
/// decode to `String`, and element types >= 1024 are user-defined and come
/// back as raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// Unsigned 8-bit integer (element type 1, "byte")
    U8(u8),
    U8Array(Vec<u8>),
    /// Signed 8-bit integer or ASCII character (element type 2, "char")
    I8(i8),
    I8Array(Vec<i8>),
    /// Unsigned 16-bit integer (element type 3, "word")
    U16(u16),
    U16Array(Vec<u16>),
    /// Signed 16-bit integer (element type 4, "short")
    I16(i16),
    I16Array(Vec<i16>),
    /// Signed 32-bit integer (element type 5, "long")
    I32(i32),
    I32Array(Vec<i32>),
    /// 32-bit float (element type 7, "float")
    F32(f32),
    F32Array(Vec<f32>),
    /// 64-bit float (element type 8, "double")
    F64(f64),
    F64Array(Vec<f64>),
    /// Packed calendar date (element type 10)
    Date(NaiveDate),
    DateArray(Vec<NaiveDate>),
    /// Packed time of day, hundredth-second precision (element type 11)
    Time(NaiveTime),
    TimeArray(Vec<NaiveTime>),
    /// Legacy thumbprint (element type 12)
    Thumb(Thumb),
    ThumbArray(Vec<Thumb>),
    /// Pascal or C string (element types 18 and 19)
    String(String),
    /// Raw bytes of a user-defined element type (>= 1024)
    UserDefined(Vec<u8>),
}

impl Value {
    /// Short name of the decoded shape, for display (e.g. `"i8"`, `"[u16]"`)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U8Array(_) => "[u8]",
            Value::I8(_) => "i8",
            Value::I8Array(_) => "[i8]",
            Value::U16(_) => "u16",
            Value::U16Array(_) => "[u16]",
            Value::I16(_) => "i16",
            Value::I16Array(_) => "[i16]",
            Value::I32(_) => "i32",
            Value::I32Array(_) => "[i32]",
            Value::F32(_) => "f32",
            Value::F32Array(_) => "[f32]",
            Value::F64(_) => "f64",
            Value::F64Array(_) => "[f64]",
            Value::Date(_) => "date",
            Value::DateArray(_) => "[date]",
            Value::Time(_) => "time",
            Value::TimeArray(_) => "[time]",
            Value::Thumb(_) => "thumb",
            Value::ThumbArray(_) => "[thumb]",
            Value::String(_) => "string",
            Value::UserDefined(_) => "bytes",
        }
    }
}

fn write_seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{}", v),
            Value::U8Array(v) => write_seq(f, v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I8Array(v) => write_seq(f, v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U16Array(v) => write_seq(f, v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I16Array(v) => write_seq(f, v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I32Array(v) => write_seq(f, v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F32Array(v) => write_seq(f, v),
            Value::F64(v) => write!(f, "{}", v),
            Value::F64Array(v) => write_seq(f, v),
            Value::Date(v) => write!(f, "{}", v),
            Value::DateArray(v) => write_seq(f, v),
            Value::Time(v) => write!(f, "{}", v),
            Value::TimeArray(v) => write_seq(f, v),
            Value::Thumb(v) => write!(f, "{}", v),
            Value::ThumbArray(v) => write_seq(f, v),
            Value::String(s) => f.write_str(s),
            Value::UserDefined(b) => write_seq(f, b),
        }
    }
}

/// Errors that can occur while reading an ABIF file
#[derive(Debug, thiserror::Error)]
pub enum AbifError {
    #[error("bad header magic {0:?}")]
    BadMagic([u8; 4]),

    #[error("unknown version {0}")]
    UnknownVersion(u16),

    #[error("tag not found: {0}")]
    TagNotFound(Tag),

    #[error("malformed value for tag: {0}")]
    MalformedValue(Tag),

    #[error("unknown value type for tag {tag}: {elem_type}")]
    UnsupportedType { tag: Tag, elem_type: i16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
