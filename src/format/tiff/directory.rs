//! IFD chain walking.
//!
//! # IFD Structure
//! ```text
//! Bytes 0-1:          Entry count N
//! Bytes 2..2+12N:     N entries of 12 bytes each
//!                       2 tag id, 2 field type, 4 count, 4 value or offset
//! Bytes 2+12N..+4:    Offset of the next IFD (0 = end of chain)
//! ```
//!
//! The chain is re-walked from the header on every call. Nothing is cached,
//! so a walk after an in-place edit always reflects the current bytes.

use std::collections::HashSet;

use tracing::debug;

use crate::error::TiffError;
use crate::io::{ByteOrder, ByteStore};

use super::parser::{TiffHeader, IFD_COUNT_SIZE, IFD_ENTRY_SIZE};
use super::tags::{FieldType, TiffTag};

// =============================================================================
// IfdEntry
// =============================================================================

/// A single 12-byte tag record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Absolute position of this record in the file
    pub offset: u64,

    /// Numeric tag identifier
    pub tag_id: u16,

    /// Field type, `None` when the code is not a classic TIFF type
    pub field_type: Option<FieldType>,

    /// Raw field type code as stored
    pub field_type_raw: u16,

    /// Number of values
    pub count: u32,

    /// Raw value-or-offset field, in file byte order
    pub value_offset_bytes: [u8; 4],
}

impl IfdEntry {
    /// Parse an entry from its 12 record bytes found at `offset`.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than 12 bytes.
    pub fn parse(bytes: &[u8], offset: u64, byte_order: ByteOrder) -> Self {
        let field_type_raw = byte_order.read_u16(&bytes[2..4]);
        IfdEntry {
            offset,
            tag_id: byte_order.read_u16(&bytes[0..2]),
            field_type: FieldType::from_u16(field_type_raw),
            field_type_raw,
            count: byte_order.read_u32(&bytes[4..8]),
            value_offset_bytes: [bytes[8], bytes[9], bytes[10], bytes[11]],
        }
    }

    /// The tag, if it is one this crate interprets.
    pub fn tag(&self) -> Option<TiffTag> {
        TiffTag::from_u16(self.tag_id)
    }

    /// The value field read as a u32: the offset for indirected values.
    #[inline]
    pub fn value_or_offset(&self, byte_order: ByteOrder) -> u32 {
        byte_order.read_u32(&self.value_offset_bytes)
    }

    /// Absolute position of the 4-byte value field.
    #[inline]
    pub const fn value_field_offset(&self) -> u64 {
        self.offset + 8
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// An Image File Directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd {
    /// Absolute position of the entry count field
    pub offset: u64,

    /// Entries in on-disk order
    pub entries: Vec<IfdEntry>,

    /// Offset of the following IFD, 0 if this is the last one
    pub next_ifd_offset: u64,

    /// Byte order of the file the IFD was read from
    pub byte_order: ByteOrder,
}

impl Ifd {
    /// Read the IFD at `offset`.
    pub fn read(store: &ByteStore, offset: u64, byte_order: ByteOrder) -> Result<Self, TiffError> {
        let entry_count = store.read_u16(offset, byte_order)? as u64;
        let entries_start = offset + IFD_COUNT_SIZE;

        let table = store.span(entries_start, (entry_count * IFD_ENTRY_SIZE) as usize)?;
        let entries = table
            .chunks_exact(IFD_ENTRY_SIZE as usize)
            .enumerate()
            .map(|(i, record)| {
                IfdEntry::parse(record, entries_start + i as u64 * IFD_ENTRY_SIZE, byte_order)
            })
            .collect();

        let next_ifd_offset =
            store.read_u32(entries_start + entry_count * IFD_ENTRY_SIZE, byte_order)? as u64;

        Ok(Ifd {
            offset,
            entries,
            next_ifd_offset,
            byte_order,
        })
    }

    /// First entry carrying `tag`, by linear scan.
    pub fn get_entry(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag_id == tag.as_u16())
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Chain Walking
// =============================================================================

/// Walk the IFD chain of a classic TIFF.
///
/// A store that does not start with a classic TIFF header yields an empty
/// list; the caller decides whether that is fatal.
///
/// The whole chain is followed, however long. Every IFD occupies at least
/// six distinct bytes of the store and none is visited twice, so the walk
/// is bounded by the store length.
///
/// # Errors
/// - `Io` if a count, entry table or next offset lies outside the store
/// - `DirectoryCycle` if a next offset revisits an earlier IFD
pub fn read_directories(store: &ByteStore) -> Result<Vec<Ifd>, TiffError> {
    let header = match TiffHeader::read(store) {
        Ok(header) => header,
        Err(TiffError::UnrecognizedContainer { reason }) => {
            debug!(store = store.identifier(), %reason, "Not a classic TIFF");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut ifds = Vec::new();
    let mut visited = HashSet::new();
    let mut offset = header.first_ifd_offset as u64;

    while offset != 0 {
        if !visited.insert(offset) {
            return Err(TiffError::DirectoryCycle(offset));
        }

        let ifd = Ifd::read(store, offset, header.byte_order)?;
        debug!(
            index = ifds.len(),
            offset = ifd.offset,
            entries = ifd.entry_count(),
            next = ifd.next_ifd_offset,
            "Read IFD"
        );

        offset = ifd.next_ifd_offset;
        ifds.push(ifd);
    }

    Ok(ifds)
}

// =============================================================================
// Tests
// =============================================================================
