//! # wsi-redact
//!
//! In-place redaction of pages inside classic TIFF Whole Slide Images.
//!
//! Slide scanners such as Hamamatsu (NDPI) store a photograph of the whole
//! glass slide, the "macro" image, as one page of the TIFF. It often shows
//! the handwritten or printed label and with it patient identifiers. This
//! library overwrites that page's pixel data with a solid placeholder
//! without moving or resizing anything else in the file.
//!
//! ## Architecture
//!
//! - [`io`] - Memory-mapped, bounds-checked byte store
//! - [`mod@format`] - Classic TIFF header, IFD chain and tag values
//! - [`placeholder`] - Solid-colour placeholder encoding
//! - [`redact`] - Page selection, output planning and the redaction engine
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use wsi_redact::{redact_macro, ExplicitPages, Redactor};
//!
//! // Redact the macro image into a copy
//! let report = redact_macro("slide.ndpi", "slide-redacted.ndpi")?;
//! println!("redacted {} page(s)", report.pages.len());
//!
//! // Redact page 3 in place
//! Redactor::new().redact_pages("slide.ndpi", "slide.ndpi", &ExplicitPages::new([3]))?;
//! # Ok::<(), wsi_redact::RedactError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod placeholder;
pub mod redact;

// Re-export commonly used types
pub use config::{Cli, CodecArg, Command, InspectConfig, RedactConfig};
pub use error::{EncodeError, IoError, RedactError, TiffError};
pub use format::tiff::{
    is_offset_indirected, read_directories, ByteOrder, Compression, FieldType, Ifd, IfdEntry,
    TiffHeader, TiffTag, ValueReader, TIFF_HEADER_SIZE,
};
pub use io::{AccessMode, ByteStore};
pub use placeholder::{
    FillColor, ImagePlaceholderEncoder, PlaceholderCodec, PlaceholderEncoder, PlaceholderRequest,
    DEFAULT_JPEG_QUALITY,
};
pub use redact::{
    redact_macro, ExplicitPages, MacroPage, OutputPlan, PageSelector, PageSummary,
    RedactedPage, RedactionReport, Redactor, SlideSummary, StorePair,
};
