//! Element type table and per-type decode rules
//!
//! Each supported element type maps to a descriptor carrying its element
//! byte size and two decode functions, one for scalar fields (element count
//! of 1) and one for sequences. The table is sparse: the format reserves
//! codes it never defined (6, 9, 13..17), and looking those up is an honest
//! `None` rather than a default entry. Codes at or above 1024 are
//! user-defined and bypass the table entirely.
//!
//! All multi-byte values are big-endian. Type names are the ones the format
//! specification uses.

use crate::directory::{Reference, USER_DEFINED_MIN};
use crate::types::{AbifError, Result, Tag, Thumb, Value};
use byteorder::{BigEndian, ByteOrder};
use chrono::{NaiveDate, NaiveTime};

/// Decode rules for one element type
pub(crate) struct TypeDescriptor {
    /// Type name from the format specification
    pub name: &'static str,
    /// Size of one element in bytes
    pub size: usize,
    /// Decode a scalar field; the slice holds at least `size` bytes
    pub one: fn(&[u8]) -> Option<Value>,
    /// Decode a sequence of `n` elements. The slice is the field's whole
    /// byte run, validated to hold at least `n * size` bytes; the string
    /// types frame themselves against the full run, everything else reads
    /// the first `n` elements.
    pub many: fn(n: usize, b: &[u8]) -> Option<Value>,
}

static BYTE: TypeDescriptor = TypeDescriptor {
    name: "byte", // unsigned 8-bit integer
    size: 1,
    one: |b| Some(Value::U8(b[0])),
    many: |n, b| Some(Value::U8Array(b[..n].to_vec())),
};

static CHAR: TypeDescriptor = TypeDescriptor {
    name: "char", // 8-bit ASCII character or signed 8-bit integer
    size: 1,
    one: |b| Some(Value::I8(b[0] as i8)),
    many: |n, b| Some(Value::I8Array(b[..n].iter().map(|&c| c as i8).collect())),
};

static WORD: TypeDescriptor = TypeDescriptor {
    name: "word", // unsigned 16-bit integer
    size: 2,
    one: |b| Some(Value::U16(BigEndian::read_u16(b))),
    many: |n, b| {
        Some(Value::U16Array(
            b[..n * 2].chunks_exact(2).map(BigEndian::read_u16).collect(),
        ))
    },
};

static SHORT: TypeDescriptor = TypeDescriptor {
    name: "short", // signed 16-bit integer
    size: 2,
    one: |b| Some(Value::I16(BigEndian::read_i16(b))),
    many: |n, b| {
        Some(Value::I16Array(
            b[..n * 2].chunks_exact(2).map(BigEndian::read_i16).collect(),
        ))
    },
};

static LONG: TypeDescriptor = TypeDescriptor {
    name: "long", // signed 32-bit integer
    size: 4,
    one: |b| Some(Value::I32(BigEndian::read_i32(b))),
    many: |n, b| {
        Some(Value::I32Array(
            b[..n * 4].chunks_exact(4).map(BigEndian::read_i32).collect(),
        ))
    },
};

static FLOAT: TypeDescriptor = TypeDescriptor {
    name: "float", // 32-bit IEEE 754
    size: 4,
    one: |b| Some(Value::F32(BigEndian::read_f32(b))),
    many: |n, b| {
        Some(Value::F32Array(
            b[..n * 4].chunks_exact(4).map(BigEndian::read_f32).collect(),
        ))
    },
};

static DOUBLE: TypeDescriptor = TypeDescriptor {
    name: "double", // 64-bit IEEE 754
    size: 8,
    one: |b| Some(Value::F64(BigEndian::read_f64(b))),
    many: |n, b| {
        Some(Value::F64Array(
            b[..n * 8].chunks_exact(8).map(BigEndian::read_f64).collect(),
        ))
    },
};

static DATE: TypeDescriptor = TypeDescriptor {
    name: "date",
    size: 4,
    one: |b| parse_date(b).map(Value::Date),
    many: |n, b| {
        b[..n * 4]
            .chunks_exact(4)
            .map(parse_date)
            .collect::<Option<Vec<_>>>()
            .map(Value::DateArray)
    },
};

static TIME: TypeDescriptor = TypeDescriptor {
    name: "time",
    size: 4,
    one: |b| parse_time(b).map(Value::Time),
    many: |n, b| {
        b[..n * 4]
            .chunks_exact(4)
            .map(parse_time)
            .collect::<Option<Vec<_>>>()
            .map(Value::TimeArray)
    },
};

static THUMB: TypeDescriptor = TypeDescriptor {
    name: "thumb",
    size: 10,
    one: |b| Some(Value::Thumb(parse_thumb(b))),
    many: |n, b| {
        Some(Value::ThumbArray(
            b[..n * 10].chunks_exact(10).map(parse_thumb).collect(),
        ))
    },
};

static P_STRING: TypeDescriptor = TypeDescriptor {
    // Pascal string: a character count in the first byte, then the
    // characters. A scalar pString is only well-formed when it is the
    // empty string.
    name: "pString",
    size: 1,
    one: |b| (b[0] == 0).then(|| Value::String(String::new())),
    many: |_, b| {
        if usize::from(b[0]) != b.len() - 1 {
            return None;
        }
        Some(Value::String(String::from_utf8_lossy(&b[1..]).into_owned()))
    },
};

static C_STRING: TypeDescriptor = TypeDescriptor {
    // C string: characters followed by a null byte. The terminator must be
    // present somewhere in the byte run.
    name: "cString",
    size: 1,
    one: |b| (b[0] == 0).then(|| Value::String(String::new())),
    many: |_, b| {
        let end = b.iter().position(|&c| c == 0)?;
        Some(Value::String(String::from_utf8_lossy(&b[..end]).into_owned()))
    },
};

/// Look up the descriptor for an element type code.
///
/// Returns `None` for reserved and out-of-range codes; the caller turns that
/// into an `UnsupportedType` error.
pub(crate) fn lookup(elem_type: i16) -> Option<&'static TypeDescriptor> {
    let descriptor = match elem_type {
        1 => &BYTE,
        2 => &CHAR,
        3 => &WORD,
        4 => &SHORT,
        5 => &LONG,
        7 => &FLOAT,
        8 => &DOUBLE,
        10 => &DATE,
        11 => &TIME,
        12 => &THUMB,
        18 => &P_STRING,
        19 => &C_STRING,
        _ => return None,
    };
    Some(descriptor)
}

/// Decode a field's raw bytes according to its reference.
///
/// `data` is everything stored for the field; the declared element count and
/// size are validated against it before any decode function runs.
pub(crate) fn decode_value(tag: Tag, reference: &Reference, data: &[u8]) -> Result<Value> {
    if reference.elem_type >= USER_DEFINED_MIN {
        // User-defined structure; hand back the raw bytes untouched
        return Ok(Value::UserDefined(data.to_vec()));
    }

    let descriptor = lookup(reference.elem_type).ok_or(AbifError::UnsupportedType {
        tag,
        elem_type: reference.elem_type,
    })?;

    let count = match usize::try_from(reference.elem_count) {
        Ok(count) if count >= 1 => count,
        _ => return Err(AbifError::MalformedValue(tag)),
    };
    let needed = count
        .checked_mul(descriptor.size)
        .ok_or(AbifError::MalformedValue(tag))?;
    if needed > data.len() {
        return Err(AbifError::MalformedValue(tag));
    }

    log::trace!(
        "decoding {} as {} x{} ({} of {} bytes)",
        tag,
        descriptor.name,
        count,
        needed,
        data.len()
    );

    let decoded = if count == 1 {
        (descriptor.one)(data)
    } else {
        (descriptor.many)(count, data)
    };
    decoded.ok_or(AbifError::MalformedValue(tag))
}

/// Packed calendar date: [year:i16][month:u8][day:u8]
fn parse_date(b: &[u8]) -> Option<NaiveDate> {
    let year = i32::from(BigEndian::read_i16(b));
    NaiveDate::from_ymd_opt(year, u32::from(b[2]), u32::from(b[3]))
}

/// Packed time of day: [hour:u8][minute:u8][second:u8][hundredths:u8]
fn parse_time(b: &[u8]) -> Option<NaiveTime> {
    NaiveTime::from_hms_milli_opt(
        u32::from(b[0]),
        u32::from(b[1]),
        u32::from(b[2]),
        u32::from(b[3]) * 10,
    )
}

/// Legacy thumbprint: [d:i32][u:i32][c:u8][n:u8]
fn parse_thumb(b: &[u8]) -> Thumb {
    Thumb {
        d: BigEndian::read_i32(&b[..4]),
        u: BigEndian::read_i32(&b[4..8]),
        c: b[8],
        n: b[9],
    }
}
