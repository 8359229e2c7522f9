//! Classic TIFF header parsing.
//!
//! # TIFF Header Structure (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! BigTIFF (version 43) is not a classic TIFF and is reported as an
//! unrecognized container.

use crate::error::TiffError;
use crate::io::{ByteOrder, ByteStore};

// =============================================================================
// Constants
// =============================================================================

/// Version number for classic TIFF
pub const VERSION_TIFF: u16 = 42;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of an IFD entry: 2 tag + 2 type + 4 count + 4 value/offset
pub const IFD_ENTRY_SIZE: u64 = 12;

/// Size of the entry count field at the start of an IFD
pub const IFD_COUNT_SIZE: u64 = 2;

/// Size of the next IFD offset field at the end of an IFD
pub const IFD_NEXT_OFFSET_SIZE: u64 = 4;

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed classic TIFF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Offset to the first IFD in the file
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a classic TIFF header from raw bytes.
    ///
    /// # Errors
    /// `UnrecognizedContainer` if the bytes are too short, the byte order
    /// mark is neither II nor MM, or the version is not 42.
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::UnrecognizedContainer {
                reason: format!(
                    "need at least {} header bytes, got {}",
                    TIFF_HEADER_SIZE,
                    bytes.len()
                ),
            });
        }

        let byte_order = ByteOrder::from_marker([bytes[0], bytes[1]]).ok_or_else(|| {
            TiffError::UnrecognizedContainer {
                reason: format!(
                    "invalid byte order mark 0x{:04X}",
                    u16::from_le_bytes([bytes[0], bytes[1]])
                ),
            }
        })?;

        let version = byte_order.read_u16(&bytes[2..4]);
        if version != VERSION_TIFF {
            return Err(TiffError::UnrecognizedContainer {
                reason: format!("expected version {}, got {}", VERSION_TIFF, version),
            });
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset: byte_order.read_u32(&bytes[4..8]),
        })
    }

    /// Parse the header at the start of a store.
    pub fn read(store: &ByteStore) -> Result<Self, TiffError> {
        let available = store.as_bytes().len().min(TIFF_HEADER_SIZE);
        Self::parse(store.span(0, available)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
