//! Types for reading STUFF archives
//!

use binrw::BinRead;
use bon::Builder;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::{self, Cursor, Read, Seek, SeekFrom},
    path::Path,
};
use tracing::{debug, instrument};

use crate::{
    error::{Error, FileNotFoundError, Result, TocError},
    types::{DirectoryEntry, Trailer, RECORD_SIZE, TRAILER_SIZE},
};

/// Smallest space the legacy check allows between the content region and the end of the file
pub const LEGACY_MIN_TAIL: u64 = 32;

/// How strictly the trailer is checked against the size of the archive
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Validation {
    /// The directory must be a whole, non-empty number of records and every entry must lie
    /// inside the content region
    #[default]
    Strict,

    /// Only the loose bound used by the game tools: at least 32 bytes after the content region.
    /// A partial record at the end of the directory is ignored.
    Legacy,
}

impl Validation {
    /// Validate a trailer value, returning the number of directory entries.
    pub fn check(self, total_length: u64, content_length: u64) -> core::result::Result<u64, TocError> {
        if content_length < TRAILER_SIZE {
            return Err(TocError::ContentTooSmall { content_length });
        }

        match self {
            Validation::Strict => {
                let Some(directory) = total_length
                    .checked_sub(content_length)
                    .and_then(|rest| rest.checked_sub(TRAILER_SIZE))
                else {
                    return Err(TocError::ContentPastEnd {
                        content_length,
                        total_length,
                    });
                };

                let remainder = directory % RECORD_SIZE;
                if remainder != 0 {
                    return Err(TocError::TrailingBytes { remainder });
                }
                if directory == 0 {
                    return Err(TocError::EmptyDirectory);
                }
            }
            Validation::Legacy => {
                if total_length < LEGACY_MIN_TAIL || content_length > total_length - LEGACY_MIN_TAIL
                {
                    return Err(TocError::ContentPastEnd {
                        content_length,
                        total_length,
                    });
                }
            }
        }

        Ok(entry_count(total_length, content_length))
    }
}

/// Options for how the STUFF file should be read
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ReadOptions {
    /// How the trailer and directory are checked
    #[builder(default)]
    pub validation: Validation,
}

/// Number of whole directory records between the content region and the trailer.
pub fn entry_count(total_length: u64, content_length: u64) -> u64 {
    total_length
        .saturating_sub(content_length)
        .saturating_sub(TRAILER_SIZE)
        / RECORD_SIZE
}

/// A struct for reading an entry from a STUFF file
pub struct StuffFile<'a, R: Read + Seek> {
    data: &'a StuffFileData,
    reader: io::Take<&'a mut R>,
}

impl<'a, R: Read + Seek> Debug for StuffFile<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StuffFile({:#?})", self.data)
    }
}

/// Methods for retrieving information on STUFF file entries
impl<'a, R: Read + Seek> StuffFile<'a, R> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`..\runtime`). Use [`crate::path::enclosed_name`]
    /// to turn it into a path.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Get the name of the file, in the raw (internal) byte representation.
    pub fn name_raw(&self) -> &[u8] {
        &self.data.name_raw
    }

    /// Get the starting offset of the file data
    pub fn offset(&self) -> u64 {
        self.data.offset
    }

    /// Get the size of the file, in bytes
    pub fn size(&self) -> u64 {
        self.data.length
    }
}

impl<R: Read + Seek> Read for StuffFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Structure representing a STUFF file entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StuffFileData {
    /// Name of the file
    pub name: Box<str>,
    /// Raw file name. To be used when name was incorrectly decoded.
    pub name_raw: Box<[u8]>,
    /// Specifies where the data of the file starts
    pub offset: u64,
    /// Size of the file data
    pub length: u64,
    /// Unused field carried over from the record
    pub reserved: u32,
}

impl From<DirectoryEntry> for StuffFileData {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            name: entry.name().into(),
            name_raw: entry.name_raw().into(),
            offset: entry.offset as u64,
            length: entry.length as u64,
            reserved: entry.reserved,
        }
    }
}

#[derive(Debug)]
struct Shared {
    total_length: u64,
    content_length: u64,
    files: Vec<StuffFileData>,
}

/// STUFF archive reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_stuff_contents(reader: impl Read + Seek) -> bw2_stuff::error::Result<()> {
///     let mut stuff = bw2_stuff::StuffArchive::new(reader)?;
///
///     for i in 0..stuff.len() {
///         let mut file = stuff.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct StuffArchive<R> {
    reader: R,
    shared: Shared,
}

impl<R> StuffArchive<R> {
    /// Number of entries contained in this archive.
    pub fn len(&self) -> usize {
        self.shared.files.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the whole archive, in bytes
    pub fn total_length(&self) -> u64 {
        self.shared.total_length
    }

    /// Size of the content region, as stored in the trailer
    pub fn content_length(&self) -> u64 {
        self.shared.content_length
    }

    /// Total size of the files in the archive, if it fits in a `u64`.
    pub fn content_size(&self) -> Option<u64> {
        self.shared
            .files
            .iter()
            .try_fold(0u64, |total, file| total.checked_add(file.length))
    }

    /// All entries, in the order they appear in the directory
    pub fn entries(&self) -> &[StuffFileData] {
        &self.shared.files
    }

    /// Returns an iterator over all the file names in this archive.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.files.iter().map(|f| f.name.as_ref())
    }

    /// Get the index of the first entry with the given name, if it's present.
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.files.iter().position(|f| f.name.as_ref() == name)
    }

    /// Get the name of a file entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared.files.get(index).map(|f| f.name.as_ref())
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl StuffArchive<File> {
    /// Open the archive at `path` with the default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ReadOptions::default())
    }

    /// Open the archive at `path`.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::from(e),
        })?;

        Self::with_options(file, options)
    }
}

impl<R: Read + Seek> StuffArchive<R> {
    /// Read a STUFF archive collecting the files it contains.
    pub fn new(reader: R) -> Result<StuffArchive<R>> {
        Self::with_options(reader, ReadOptions::default())
    }

    /// Read a STUFF archive with the given options.
    pub fn with_options(mut reader: R, options: ReadOptions) -> Result<StuffArchive<R>> {
        let shared = Self::get_metadata(&mut reader, options)?;
        Ok(StuffArchive { reader, shared })
    }

    /// Search for a file entry by name
    pub fn by_name(&mut self, name: &str) -> Result<StuffFile<'_, R>> {
        let Some(index) = self.index_for_name(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&mut self, file_number: usize) -> Result<StuffFile<'_, R>> {
        let data = self
            .shared
            .files
            .get(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        self.reader.seek(SeekFrom::Start(data.offset))?;

        Ok(StuffFile {
            data,
            reader: self.reader.by_ref().take(data.length),
        })
    }

    /// Read the complete data of a contained file.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if the archive ends before the entry does.
    #[instrument(skip(self), err)]
    pub fn read_entry(&mut self, file_number: usize) -> Result<Vec<u8>> {
        let total_length = self.shared.total_length;
        let mut file = self.by_index(file_number)?;

        // Never allocate more than the archive can hold.
        if file.offset() + file.size() > total_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} spans {}..{} past the end of a {total_length} byte archive",
                    file.name(),
                    file.offset(),
                    file.offset() + file.size()
                ),
            )
            .into());
        }

        let mut buffer = vec![0; file.size() as usize];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    #[instrument(skip(reader), err)]
    fn read_trailer(reader: &mut R, total_length: u64) -> Result<u64> {
        if total_length < TRAILER_SIZE {
            return Err(TocError::TooShort { total_length }.into());
        }

        reader.seek(SeekFrom::Start(total_length - TRAILER_SIZE))?;
        let trailer = Trailer::read(reader)?;

        Ok(trailer.content_length as u64)
    }

    #[instrument(skip(reader), err)]
    fn read_directory(
        reader: &mut R,
        content_length: u64,
        count: u64,
    ) -> Result<Vec<DirectoryEntry>> {
        reader.seek(SeekFrom::Start(content_length))?;

        let mut block = vec![0; (count * RECORD_SIZE) as usize];
        reader.read_exact(&mut block)?;

        let mut records = Cursor::new(block);
        (0..count)
            .map(|_| DirectoryEntry::read(&mut records).map_err(Error::from))
            .collect()
    }

    fn get_metadata(reader: &mut R, options: ReadOptions) -> Result<Shared> {
        let total_length = reader.seek(SeekFrom::End(0))?;
        let content_length = Self::read_trailer(reader, total_length)?;
        debug!("content length: {content_length} bytes");

        let count = options.validation.check(total_length, content_length)?;
        debug!("{count} file dictionary entries");

        let files = Self::read_directory(reader, content_length, count)?
            .into_iter()
            .map(StuffFileData::from)
            .collect::<Vec<_>>();

        if options.validation == Validation::Strict {
            if let Some((index, file)) = files
                .iter()
                .enumerate()
                .find(|(_, f)| f.offset + f.length > content_length)
            {
                return Err(Error::InvalidEntry {
                    index,
                    name: file.name.to_string(),
                    offset: file.offset,
                    length: file.length,
                    content_length,
                });
            }
        }

        Ok(Shared {
            total_length,
            content_length,
            files,
        })
    }
}
