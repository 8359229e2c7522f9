//! TIFF tag and field type definitions.
//!
//! This module defines the vocabulary for directory walking and redaction:
//! - Field types that determine how values are encoded and whether they fit inline
//! - Tag IDs for the fields a redacted page must carry
//! - Compression codes, for listings and for the rewrite to "no compression"

// =============================================================================
// TIFF Field Types
// =============================================================================

/// The twelve classic TIFF field types.
///
/// Each field type has a fixed element size, which decides whether a value
/// is stored inline in the 4-byte value field of an IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two Longs: numerator and denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Undefined byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLongs: numerator and denominator
    SRational = 10,

    /// IEEE single precision float
    Float = 11,

    /// IEEE double precision float
    Double = 12,
}

impl FieldType {
    /// Maximum bytes that can be stored inline in a classic TIFF IFD entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Check if `count` values of this type fit in the 4-byte value field.
    ///
    /// Rational, SRational and Double never fit, whatever the count.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        if matches!(
            self,
            FieldType::Rational | FieldType::SRational | FieldType::Double
        ) {
            return false;
        }

        let total_size = self.size_in_bytes() as u64 * count as u64;
        total_size <= Self::INLINE_THRESHOLD as u64
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// TIFF tag IDs used when locating and describing a page's strip.
///
/// Tags not listed here are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    /// Image width in pixels
    ImageWidth = 256,

    /// Image height (length) in pixels
    ImageLength = 257,

    /// Bits per sample
    BitsPerSample = 258,

    /// Compression scheme used
    Compression = 259,

    /// Photometric interpretation (RGB, YCbCr, etc.)
    PhotometricInterpretation = 262,

    /// Byte offsets of strips
    StripOffsets = 273,

    /// Number of components per pixel
    SamplesPerPixel = 277,

    /// Row count per strip
    RowsPerStrip = 278,

    /// Byte counts of strips
    StripByteCounts = 279,
}

impl TiffTag {
    /// Tags a page must carry before its strip can be redacted.
    pub const REQUIRED_FOR_REDACTION: [TiffTag; 5] = [
        TiffTag::ImageWidth,
        TiffTag::ImageLength,
        TiffTag::Compression,
        TiffTag::StripOffsets,
        TiffTag::StripByteCounts,
    ];

    /// Create a TiffTag from its numeric value.
    ///
    /// Returns `None` for tags this crate does not interpret.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            256 => Some(TiffTag::ImageWidth),
            257 => Some(TiffTag::ImageLength),
            258 => Some(TiffTag::BitsPerSample),
            259 => Some(TiffTag::Compression),
            262 => Some(TiffTag::PhotometricInterpretation),
            273 => Some(TiffTag::StripOffsets),
            277 => Some(TiffTag::SamplesPerPixel),
            278 => Some(TiffTag::RowsPerStrip),
            279 => Some(TiffTag::StripByteCounts),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// TIFF compression scheme identifiers seen in slide files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Compression {
    /// No compression
    None = 1,

    /// LZW compression
    Lzw = 5,

    /// "Old-style" JPEG
    OldJpeg = 6,

    /// JPEG compression
    Jpeg = 7,

    /// JPEG 2000, Aperio YCbCr
    Jpeg2000 = 33003,

    /// JPEG 2000, Aperio RGB
    Jpeg2000Rgb = 33005,

    /// JPEG 2000, generic
    Jp2000 = 34712,
}

impl Compression {
    /// Create a Compression from its numeric value.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Compression::None),
            5 => Some(Compression::Lzw),
            6 => Some(Compression::OldJpeg),
            7 => Some(Compression::Jpeg),
            33003 => Some(Compression::Jpeg2000),
            33005 => Some(Compression::Jpeg2000Rgb),
            34712 => Some(Compression::Jp2000),
            _ => None,
        }
    }

    /// Short name used in directory listings.
    pub const fn name(self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::Lzw => "LZW",
            Compression::OldJpeg | Compression::Jpeg => "JPEG",
            Compression::Jpeg2000 | Compression::Jpeg2000Rgb | Compression::Jp2000 => "JP2K",
        }
    }

    /// Name for a raw compression code, `Unknown` when unrecognized.
    pub fn name_for(code: u32) -> &'static str {
        Self::from_u32(code).map_or("Unknown", Self::name)
    }
}

// =============================================================================
// Tests
// =============================================================================
