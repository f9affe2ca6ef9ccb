//! ABIF file reader
//!
//! [`Reader`] owns a seekable byte source and the tag index parsed from the
//! file's directory. Construction reads the header and directory once; every
//! [`Reader::value`] call afterwards resolves and decodes exactly one field,
//! seeking on demand when the field's data is stored out of line.

use crate::directory::{DataLocation, Header, Reference};
use crate::typetable::decode_value;
use crate::types::{AbifError, Result, Tag, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Read-only ABIF file reader
pub struct Reader<R> {
    src: R,
    version: u16,
    index: HashMap<Tag, Reference>,
}

impl Reader<BufReader<File>> {
    /// Open an ABIF file from disk
    pub fn open(path: &Path) -> Result<Self> {
        log::info!("Opening ABIF file: {:?}", path);
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Parse the header and directory of `src` and build the tag index.
    ///
    /// Fails with `BadMagic`/`UnknownVersion` if the source is not a major
    /// version 1 ABIF file, or with `IoError` if reading the header or
    /// directory fails. On failure no reader is constructed.
    pub fn new(mut src: R) -> Result<Self> {
        src.seek(SeekFrom::Start(0))?;
        let header = Header::read_from(&mut src)?;

        let dir_ref = &header.dir.reference;
        let entry_count = usize::try_from(dir_ref.elem_count).unwrap_or(0);
        log::debug!(
            "ABIF version {}, directory of {} entries at offset {}",
            header.version,
            entry_count,
            dir_ref.offset()
        );

        let mut index = HashMap::with_capacity(entry_count);
        if entry_count > 0 {
            // The entries array is larger than the 4-byte payload for any
            // non-empty directory, so its reference is always an offset.
            seek_to(&mut src, dir_ref.offset())?;
            for _ in 0..entry_count {
                let entry = crate::directory::DirEntry::read_from(&mut src)?;
                log::trace!("directory entry {} (type {})", entry.tag, entry.reference.elem_type);
                // Duplicate tags exist in real-world files; the last entry wins
                index.insert(entry.tag, entry.reference);
            }
        }

        Ok(Self {
            src,
            version: header.version,
            index,
        })
    }

    /// File format version from the header (e.g. 101)
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Number of distinct tags in the directory
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the directory holds no tags
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True if `tag` is present in the directory
    pub fn contains(&self, tag: Tag) -> bool {
        self.index.contains_key(&tag)
    }

    /// The tags available in the file, in unspecified order.
    ///
    /// Sort the result for deterministic output; [`Tag`]'s ordering (name
    /// bytes, then number) is the conventional display order.
    pub fn tags(&self) -> Vec<Tag> {
        self.index.keys().copied().collect()
    }

    /// Read and decode the value stored for `tag`.
    ///
    /// Values are not cached; each call re-reads from the source, seeking
    /// first if the data is stored out of line. The exclusive borrow keeps a
    /// concurrent caller from seeking between this call's seek and read - the
    /// index itself is immutable and freely shareable, the source cursor is
    /// not.
    pub fn value(&mut self, tag: Tag) -> Result<Value> {
        let reference = *self.index.get(&tag).ok_or(AbifError::TagNotFound(tag))?;
        let data = self.field_data(tag, &reference)?;
        decode_value(tag, &reference, &data)
    }

    /// Fetch the raw bytes a reference points at, inline or from the file
    fn field_data(&mut self, tag: Tag, reference: &Reference) -> Result<Vec<u8>> {
        let size = usize::try_from(reference.data_size)
            .map_err(|_| AbifError::MalformedValue(tag))?;
        match reference.location() {
            DataLocation::Inline(payload) => Ok(payload[..size].to_vec()),
            DataLocation::Offset(offset) => {
                seek_to(&mut self.src, offset)?;
                let mut data = vec![0u8; size];
                self.src.read_exact(&mut data)?;
                Ok(data)
            }
        }
    }
}

fn seek_to<R: Seek>(src: &mut R, offset: i64) -> Result<()> {
    let offset = u64::try_from(offset).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("negative data offset {}", offset),
        )
    })?;
    src.seek(SeekFrom::Start(offset))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reject_truncated_header() {
        let result = Reader::new(Cursor::new(b"ABIF".to_vec()));
        assert!(matches!(result, Err(AbifError::IoError(_))));
    }

    #[test]
    fn test_empty_directory() {
        // Header with a zero-entry directory and no directory data at all
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ABIF");
        bytes.extend_from_slice(&101u16.to_be_bytes());
        bytes.extend_from_slice(b"tdir");
        bytes.extend_from_slice(&1i32.to_be_bytes());
        bytes.extend_from_slice(&1023i16.to_be_bytes());
        bytes.extend_from_slice(&28i16.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes()); // element count
        bytes.extend_from_slice(&0i32.to_be_bytes()); // data size
        bytes.extend_from_slice(&[0u8; 4]); // payload
        bytes.extend_from_slice(&0i32.to_be_bytes()); // data handle

        let reader = Reader::new(Cursor::new(bytes)).unwrap();
        assert!(reader.is_empty());
        assert_eq!(reader.version(), 101);
        assert!(reader.tags().is_empty());
    }
}
