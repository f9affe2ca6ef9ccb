//! ABIF header and directory entry layout
//!
//! An ABIF file starts with a fixed header: the 4-byte magic `ABIF`, a 16-bit
//! version, and one directory entry describing where the directory array
//! lives. The directory array is a sequence of 28-byte entries, each pairing
//! a tag with a reference to that field's data. All integers are big-endian.

use crate::types::{AbifError, Result, Tag};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::Read;

/// File magic, first four bytes of every ABIF file
pub(crate) const MAGIC: [u8; 4] = *b"ABIF";

/// Element type codes at or above this are user-defined
pub(crate) const USER_DEFINED_MIN: i16 = 1024;

/// Where a reference's data lives.
///
/// The 4-byte payload of a reference is the data itself when the declared
/// data size fits in it; otherwise the same bytes are a big-endian offset
/// from the start of the file. The two cases are decided once, by size,
/// never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataLocation {
    /// Data is the first `data_size` bytes of the payload
    Inline([u8; 4]),
    /// Data is `data_size` bytes at this offset from the file start
    Offset(i64),
}

/// A reference to one field's data, as stored in a directory entry.
///
/// `elem_type` selects the decode rule, `elem_count` the number of elements,
/// and `data_size` the total byte size of the stored data. The on-disk record
/// also carries a declared per-element size and a data handle; both are
/// legacy fields and are discarded on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Reference {
    pub elem_type: i16,
    pub elem_count: i32,
    pub data_size: i32,
    pub payload: [u8; 4],
}

impl Reference {
    /// Read a 20-byte reference record
    pub(crate) fn read_from<R: Read>(src: &mut R) -> std::io::Result<Self> {
        let elem_type = src.read_i16::<BigEndian>()?;
        let _elem_size = src.read_i16::<BigEndian>()?; // declared element size, unused
        let elem_count = src.read_i32::<BigEndian>()?;
        let data_size = src.read_i32::<BigEndian>()?;
        let mut payload = [0u8; 4];
        src.read_exact(&mut payload)?;
        let _data_handle = src.read_i32::<BigEndian>()?; // unused
        Ok(Self {
            elem_type,
            elem_count,
            data_size,
            payload,
        })
    }

    /// Resolve the payload's inline-vs-offset interpretation
    pub(crate) fn location(&self) -> DataLocation {
        if self.data_size <= 4 {
            DataLocation::Inline(self.payload)
        } else {
            DataLocation::Offset(self.offset())
        }
    }

    /// The payload reinterpreted as a file offset
    pub(crate) fn offset(&self) -> i64 {
        i64::from(BigEndian::read_i32(&self.payload))
    }
}

/// One directory entry: a tag plus the reference to its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DirEntry {
    pub tag: Tag,
    pub reference: Reference,
}

impl DirEntry {
    /// Read a 28-byte directory entry record
    pub(crate) fn read_from<R: Read>(src: &mut R) -> std::io::Result<Self> {
        let mut name = [0u8; 4];
        src.read_exact(&mut name)?;
        let num = src.read_i32::<BigEndian>()?;
        let reference = Reference::read_from(src)?;
        Ok(Self {
            tag: Tag::new(name, num),
            reference,
        })
    }
}

/// The fixed file header
#[derive(Debug, Clone, Copy)]
pub(crate) struct Header {
    pub version: u16,
    /// Entry describing the directory array itself
    pub dir: DirEntry,
}

impl Header {
    /// Read and validate the file header.
    ///
    /// Fails with `BadMagic`/`UnknownVersion` on a foreign or incompatible
    /// file. Only major version 1 is accepted; minor versions within it are
    /// forward-compatible.
    pub(crate) fn read_from<R: Read>(src: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        src.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(AbifError::BadMagic(magic));
        }

        let version = src.read_u16::<BigEndian>()?;
        if version / 100 != 1 {
            return Err(AbifError::UnknownVersion(version));
        }

        let dir = DirEntry::read_from(src)?;
        Ok(Self { version, dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reference_bytes(
        elem_type: i16,
        elem_count: i32,
        data_size: i32,
        payload: [u8; 4],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&elem_type.to_be_bytes());
        buf.extend_from_slice(&0i16.to_be_bytes()); // element size
        buf.extend_from_slice(&elem_count.to_be_bytes());
        buf.extend_from_slice(&data_size.to_be_bytes());
        buf.extend_from_slice(&payload);
        buf.extend_from_slice(&0i32.to_be_bytes()); // data handle
        buf
    }

    #[test]
    fn test_reference_roundtrip() {
        let bytes = reference_bytes(4, 2, 4, [0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(bytes.len(), 20);

        let reference = Reference::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(reference.elem_type, 4);
        assert_eq!(reference.elem_count, 2);
        assert_eq!(reference.data_size, 4);
        assert_eq!(reference.payload, [0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_location_threshold() {
        // At four bytes or below, the payload is the data itself
        let inline = Reference {
            elem_type: 1,
            elem_count: 4,
            data_size: 4,
            payload: [1, 2, 3, 4],
        };
        assert_eq!(inline.location(), DataLocation::Inline([1, 2, 3, 4]));

        // Above four bytes, the same payload becomes a big-endian offset
        let indirect = Reference {
            data_size: 5,
            payload: [0, 0, 0x01, 0x80],
            ..inline
        };
        assert_eq!(indirect.location(), DataLocation::Offset(0x180));
    }

    #[test]
    fn test_dir_entry_read() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"DATA");
        bytes.extend_from_slice(&9i32.to_be_bytes());
        bytes.extend_from_slice(&reference_bytes(5, 1, 4, [0, 0, 0, 7]));
        assert_eq!(bytes.len(), 28);

        let entry = DirEntry::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(entry.tag, Tag::new(*b"DATA", 9));
        assert_eq!(entry.reference.elem_type, 5);
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&101u16.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 28]);

        match Header::read_from(&mut Cursor::new(bytes)) {
            Err(AbifError::BadMagic(magic)) => assert_eq!(&magic, b"RIFF"),
            other => panic!("expected BadMagic, got {:?}", other),
        }
    }

    #[test]
    fn test_header_version_gate() {
        // 1xx versions are accepted, anything else is not
        for (version, ok) in [(100u16, true), (101, true), (199, true), (200, false), (99, false)] {
            let mut bytes = Vec::new();
            bytes.extend_from_slice(&MAGIC);
            bytes.extend_from_slice(&version.to_be_bytes());
            bytes.extend_from_slice(b"tdir");
            bytes.extend_from_slice(&1i32.to_be_bytes());
            bytes.extend_from_slice(&reference_bytes(1023, 0, 0, [0; 4]));

            let result = Header::read_from(&mut Cursor::new(bytes));
            match (ok, result) {
                (true, Ok(header)) => assert_eq!(header.version, version),
                (false, Err(AbifError::UnknownVersion(v))) => assert_eq!(v, version),
                (expected, got) => panic!("version {}: expected ok={}, got {:?}", version, expected, got),
            }
        }
    }
}
