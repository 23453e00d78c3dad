//! Base types for structure of STUFF file.

use binrw::BinRead;
use std::borrow::Cow;

/// Size of the fixed-width name field of a [`DirectoryEntry`]
pub const NAME_SIZE: usize = 256;

/// Size of a single [`DirectoryEntry`] record on disk
pub const RECORD_SIZE: u64 = NAME_SIZE as u64 + 4 + 4 + 4;

/// Size of the [`Trailer`] at the end of the archive
pub const TRAILER_SIZE: u64 = 4;

/// STUFF file trailer
///
/// The last four bytes of the archive. Holds the length of the content region, which is also the
/// offset where the directory starts.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct Trailer {
    /// Length of the content region
    pub content_length: u32,
}

/// STUFF directory entry
///
/// Describes one file stored in the content region. All integers are little endian.
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(little)]
pub struct DirectoryEntry {
    /// Relative path of the file, NUL padded
    pub name: [u8; NAME_SIZE],

    /// Offset from the start of the archive to the file data
    pub offset: u32,

    /// Size of the file data
    pub length: u32,

    /// Unknown, always carried but never used
    pub reserved: u32,
}

impl Default for DirectoryEntry {
    fn default() -> Self {
        Self {
            name: [0; NAME_SIZE],
            offset: Default::default(),
            length: Default::default(),
            reserved: Default::default(),
        }
    }
}

impl DirectoryEntry {
    /// The name bytes up to the first NUL.
    ///
    /// A name that fills the whole field without a terminator is returned in full.
    pub fn name_raw(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == b'\0')
            .unwrap_or(NAME_SIZE);
        &self.name[..end]
    }

    /// The name decoded as UTF-8, replacing invalid sequences.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_raw())
    }

    /// Offset one past the last byte of the file data
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{DirectoryEntry, Trailer, NAME_SIZE, RECORD_SIZE};

    fn record(name: &[u8], offset: u32, length: u32, reserved: u32) -> Vec<u8> {
        let mut bytes = name.to_vec();
        bytes.resize(NAME_SIZE, 0);
        bytes.extend_from_slice(&offset.to_le_bytes());
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(&reserved.to_le_bytes());
        bytes
    }

    #[test]
    fn read_trailer() -> Result<()> {
        let mut input = Cursor::new(vec![0xBC, 0x02, 0x00, 0x00]);

        assert_eq!(
            Trailer::read(&mut input)?,
            Trailer {
                content_length: 700
            }
        );

        Ok(())
    }

    #[test]
    fn read_entry() -> Result<()> {
        let bytes = record(b"a/b.txt", 0x24, 0x0B, 0xDEADBEEF);
        assert_eq!(bytes.len() as u64, RECORD_SIZE);

        let entry = DirectoryEntry::read(&mut Cursor::new(bytes))?;

        assert_eq!(entry.name_raw(), b"a/b.txt");
        assert_eq!(entry.name(), "a/b.txt");
        assert_eq!(entry.offset, 36);
        assert_eq!(entry.length, 11);
        assert_eq!(entry.reserved, 0xDEADBEEF);
        assert_eq!(entry.end(), 47);

        Ok(())
    }

    #[test]
    fn read_entry_stops_at_first_nul() -> Result<()> {
        let mut name = b"data\\sound.wav".to_vec();
        name.push(0);
        name.extend_from_slice(b"leftover garbage");

        let entry = DirectoryEntry::read(&mut Cursor::new(record(&name, 0, 0, 0)))?;

        assert_eq!(entry.name(), "data\\sound.wav");

        Ok(())
    }

    #[test]
    fn read_entry_without_terminator() -> Result<()> {
        let name = [b'x'; NAME_SIZE];

        let entry = DirectoryEntry::read(&mut Cursor::new(record(&name, 4, 8, 0)))?;

        assert_eq!(entry.name_raw().len(), NAME_SIZE);
        assert_eq!(entry.name(), "x".repeat(NAME_SIZE));

        Ok(())
    }

    #[test]
    fn read_entry_with_invalid_utf8() -> Result<()> {
        let entry = DirectoryEntry::read(&mut Cursor::new(record(&[b'a', 0xFF, b'b'], 0, 0, 0)))?;

        assert_eq!(entry.name_raw(), &[b'a', 0xFF, b'b']);
        assert_eq!(entry.name(), "a\u{FFFD}b");

        Ok(())
    }

    #[test]
    fn read_truncated_entry() {
        let mut bytes = record(b"short.bin", 0, 0, 0);
        bytes.truncate(RECORD_SIZE as usize - 1);

        assert!(DirectoryEntry::read(&mut Cursor::new(bytes)).is_err());
    }
}
