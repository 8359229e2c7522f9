use thiserror::Error;

use crate::format::tiff::TiffTag;

/// I/O errors from the memory-mapped byte store.
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// File could not be opened or created
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    /// File could not be memory-mapped
    #[error("Failed to map {path}: {message}")]
    Map { path: String, message: String },

    /// Output file could not be sized to match the input
    #[error("Failed to resize {path} to {len} bytes: {message}")]
    Resize {
        path: String,
        len: u64,
        message: String,
    },

    /// Mapped changes could not be written back
    #[error("Failed to flush {path}: {message}")]
    Flush { path: String, message: String },

    /// Requested range exceeds store bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Write attempted on a store opened read-only
    #[error("Store is read-only: {0}")]
    ReadOnly(String),

    /// Stores of different lengths cannot be copied onto each other
    #[error("Length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
}

/// Errors that can occur when walking a TIFF directory chain.
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the store
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Header is not a classic TIFF header
    #[error("Unrecognized container: {reason}")]
    UnrecognizedContainer { reason: String },

    /// Field type code outside the twelve classic TIFF types
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(u16),

    /// Next-IFD offset points back to an IFD already visited
    #[error("IFD chain loops back to offset {0}")]
    DirectoryCycle(u64),
}

/// Errors from the placeholder image collaborator.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// Width or height cannot be encoded
    #[error("Invalid placeholder dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Codec failed to produce output
    #[error("Failed to encode placeholder: {message}")]
    Encode { message: String },
}

/// Errors that can occur while redacting pages.
#[derive(Debug, Clone, Error)]
pub enum RedactError {
    /// I/O error on input or output
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Directory chain could not be parsed
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// Input has no classic TIFF directories
    #[error("No TIFF pages found")]
    NoPagesFound,

    /// Selected page lacks a tag needed to locate or describe its strip
    #[error("Cannot find {tag:?} tag needed to redact page {page}")]
    MissingRequiredTag { page: usize, tag: TiffTag },

    /// Selected page stores its pixels in more than one strip
    #[error("Cannot handle strip data with count {count} > 1, page {page}")]
    MultiStripUnsupported { page: usize, count: u32 },

    /// Placeholder does not fit into the original strip
    #[error("Placeholder of {payload} bytes exceeds strip capacity of {capacity} bytes, page {page}")]
    PayloadTooLarge {
        page: usize,
        payload: usize,
        capacity: usize,
    },

    /// Placeholder collaborator failed
    #[error("Failed to encode placeholder for page {page}: {source}")]
    EncodingFailed { page: usize, source: EncodeError },
}
