//! Error types that can be emitted from this library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// archive does not exist
    #[error("couldn't find specified file: {}", .0.display())]
    NotFound(PathBuf),

    /// the trailer does not describe a valid directory
    #[error("invalid table of contents")]
    #[diagnostic(help("the file is probably not a STUFF archive, or it has been truncated"))]
    InvalidTableOfContents(#[from] TocError),

    /// a directory entry points outside of the content region
    #[error(
        "entry {index} ({name}) spans {offset}..{} but the content region ends at {content_length}",
        .offset + .length
    )]
    InvalidEntry {
        /// position of the entry in the directory
        index: usize,
        /// name of the entry
        name: String,
        /// start of the entry data
        offset: u64,
        /// size of the entry data
        length: u64,
        /// size of the content region
        content_length: u64,
    },

    /// an entry name would be written outside of the target directory
    #[error("refusing to extract {name:?}: {reason}")]
    InvalidPath {
        /// name as stored in the archive
        name: String,
        /// why the name was rejected
        reason: &'static str,
    },

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

/// Error type to provide further information on a rejected table of contents
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum TocError {
    /// the archive is too small to hold a trailer
    #[error("archive is only {total_length} bytes long")]
    TooShort {
        /// size of the archive
        total_length: u64,
    },

    /// the content region is smaller than the format allows
    #[error("content length {content_length} is too small")]
    ContentTooSmall {
        /// value read from the trailer
        content_length: u64,
    },

    /// the content region leaves no room for the directory
    #[error("content length {content_length} runs past the directory of a {total_length} byte archive")]
    ContentPastEnd {
        /// value read from the trailer
        content_length: u64,
        /// size of the archive
        total_length: u64,
    },

    /// the directory is not a whole number of records
    #[error("directory has {remainder} bytes left over after the last record")]
    TrailingBytes {
        /// bytes that don't form a complete record
        remainder: u64,
    },

    /// the directory holds no records
    #[error("directory is empty")]
    EmptyDirectory,
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
