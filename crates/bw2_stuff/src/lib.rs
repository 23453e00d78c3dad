//! This library handles reading and extracting **STUFF** archives used by *Black & White 2*.
//!
//! # STUFF Archive Format Documentation
//!
//! The game ships most of its assets inside a single `everything.stuff` file. The format has no
//! header and no magic number: the table of contents is anchored at the *end* of the file.
//!
//! ## File Structure
//!
//! | Region         | Size                       | Description                                  |
//! |----------------|----------------------------|----------------------------------------------|
//! | Content        | `content_length` bytes     | Raw file payloads, concatenated              |
//! | Directory      | `count × 268` bytes        | One record per embedded file                 |
//! | Trailer        | 4 bytes                    | `content_length`, little endian              |
//!
//! ### Trailer
//!
//! The last four bytes of the file hold the length of the content region. Since the content
//! region starts at offset zero this is also the offset of the directory. There is no entry
//! count anywhere in the file, it is derived from the space left between the content region and
//! the trailer:
//!
//! ```text
//! count = (file_length - content_length - 4) / 268
//! ```
//!
//! ### Directory Entry
//!
//! | Offset (bytes) | Field    | Description                                                   |
//! |----------------|----------|---------------------------------------------------------------|
//! | 0x0000         | Name     | 256 bytes: relative path, NUL terminated and padded           |
//! | 0x0100         | Offset   | 4 bytes: offset from the start of the file to the data        |
//! | 0x0104         | Length   | 4 bytes: size of the data                                     |
//! | 0x0108         | Reserved | 4 bytes: unknown, unused                                      |
//!
//! - **Name**: read up to the first NUL byte. Names were written on Windows and usually use `\`
//!   as the separator. A name filling all 256 bytes without a terminator is kept as is.
//! - **Offset** and **Length** describe a range that must lie inside the content region.
//!
//! ## Validation
//!
//! The game's own tooling only checks that the trailer leaves at least 32 bytes at the end of the
//! file. By default this crate instead requires the directory to be a whole, non-empty number of
//! records and every entry to fit in the content region. The loose check is still available as
//! [`read::Validation::Legacy`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.stuff`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression**: None
//!

pub mod error;
pub mod extract;
pub mod path;
pub mod read;
pub mod types;

pub use extract::ExtractOptions;
pub use read::{ReadOptions, StuffArchive, Validation};
