//! TIFF tag value resolution.
//!
//! Values are stored either inline in the 4-byte value field of an IFD entry
//! or at an offset that field points to. Which one applies is a pure
//! function of the field type and count; see [`FieldType::fits_inline`].
//!
//! Only single scalars are resolved here: width, height, compression code
//! and the offset and byte count of a single strip.

use crate::error::TiffError;
use crate::io::{ByteOrder, ByteStore};

use super::directory::IfdEntry;
use super::tags::FieldType;

/// Whether the entry's value field holds an offset rather than the value.
///
/// # Errors
/// `UnsupportedValueType` if the field type code is unknown, since the
/// inline capacity cannot be decided.
pub fn is_offset_indirected(entry: &IfdEntry) -> Result<bool, TiffError> {
    let field_type = entry
        .field_type
        .ok_or(TiffError::UnsupportedValueType(entry.field_type_raw))?;
    Ok(!field_type.fits_inline(entry.count))
}

// =============================================================================
// ValueReader
// =============================================================================

/// Reads tag values from a store, respecting the file's byte order.
pub struct ValueReader<'a> {
    store: &'a ByteStore,
    byte_order: ByteOrder,
}

impl<'a> ValueReader<'a> {
    pub fn new(store: &'a ByteStore, byte_order: ByteOrder) -> Self {
        Self { store, byte_order }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Resolve the first value of an entry as a u32.
    ///
    /// Inline values are decoded from the value field at the width of the
    /// field type; indirected values are read from the stored offset.
    pub fn read_scalar(&self, entry: &IfdEntry) -> Result<u32, TiffError> {
        let field_type = entry
            .field_type
            .ok_or(TiffError::UnsupportedValueType(entry.field_type_raw))?;

        if is_offset_indirected(entry)? {
            let offset = entry.value_or_offset(self.byte_order) as u64;
            let value = match field_type.size_in_bytes() {
                1 => self.store.read_u8(offset)? as u32,
                2 => self.store.read_u16(offset, self.byte_order)? as u32,
                _ => self.store.read_u32(offset, self.byte_order)?,
            };
            return Ok(value);
        }

        Ok(inline_scalar(field_type, &entry.value_offset_bytes, self.byte_order))
    }
}

/// Decode an inline value, which is left-justified in the value field.
fn inline_scalar(field_type: FieldType, bytes: &[u8; 4], byte_order: ByteOrder) -> u32 {
    match field_type.size_in_bytes() {
        1 => bytes[0] as u32,
        2 => byte_order.read_u16(bytes) as u32,
        _ => byte_order.read_u32(bytes),
    }
}

// =============================================================================
// Tests
// =============================================================================
