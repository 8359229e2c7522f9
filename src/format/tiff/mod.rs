//! Classic TIFF directory walking for Whole Slide Images.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values are read and
//!   written respecting this order.
//!
//! - **Classic TIFF only**: 32-bit offsets, 12-byte IFD entries. BigTIFF
//!   files are reported as having no directories.
//!
//! - **IFD (Image File Directory)**: metadata and pointers to image data.
//!   Slide files chain several IFDs: pyramid levels, then label and macro
//!   images.
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored inline
//!   in the IFD entry, larger values at an offset the entry points to.

mod directory;
mod parser;
mod tags;
mod values;

pub use crate::io::ByteOrder;
pub use directory::{read_directories, Ifd, IfdEntry};
pub use parser::{TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE, VERSION_TIFF};
pub use tags::{Compression, FieldType, TiffTag};
pub use values::{is_offset_indirected, ValueReader};
