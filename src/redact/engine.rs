//! Redaction engine.
//!
//! For each selected page the engine:
//! 1. Locates ImageWidth, ImageLength, Compression, StripOffsets and
//!    StripByteCounts in the page's IFD
//! 2. Rejects pages stored in more than one strip
//! 3. Zero-fills the strip in the output store
//! 4. Writes a solid placeholder image at the start of the strip, provided
//!    it fits in the strip's original byte count
//! 5. Sets the page's Compression value to 1 (no compression)
//!
//! Nothing is moved or resized: the output has the input's length, and every
//! byte outside the redacted strips and compression values is unchanged.
//!
//! Pages are processed in ascending index order and earlier pages are not
//! rolled back when a later page fails. Callers needing all-or-nothing
//! behaviour should redact into a temporary path and rename it on success.

use std::path::Path;

use tracing::{debug, info, warn, Level};

use crate::error::{IoError, RedactError};
use crate::format::tiff::{
    read_directories, ByteOrder, Compression, FieldType, Ifd, IfdEntry, TiffTag, ValueReader,
};
use crate::io::ByteStore;
use crate::placeholder::{
    FillColor, ImagePlaceholderEncoder, PlaceholderCodec, PlaceholderEncoder, PlaceholderRequest,
};

use super::output::{OutputPlan, StorePair};
use super::policy::{MacroPage, PageSelector};
use super::summary::PageSummary;

/// Compression value meaning "no compression".
pub const NO_COMPRESSION: u32 = Compression::None as u32;

// =============================================================================
// Report Types
// =============================================================================

/// One page that was redacted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RedactedPage {
    /// Index of the page in the IFD chain
    pub index: usize,
    pub width: u32,
    pub height: u32,
    /// Absolute offset of the strip that was overwritten
    pub strip_offset: u64,
    /// Strip byte count, which bounds the placeholder
    pub capacity: usize,
    /// Placeholder bytes written at the start of the strip
    pub payload_len: usize,
    /// Compression value before it was set to 1
    pub previous_compression: u32,
}

/// Outcome of a successful redaction run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RedactionReport {
    /// Whether the input file itself was modified
    pub in_place: bool,
    /// Length of the output, always equal to the input's
    pub file_len: u64,
    pub pages: Vec<RedactedPage>,
}

// =============================================================================
// Redactor
// =============================================================================

/// Overwrites selected pages of a classic TIFF with placeholders.
#[derive(Debug, Clone, Default)]
pub struct Redactor<E = ImagePlaceholderEncoder> {
    encoder: E,
    fill: FillColor,
    codec: PlaceholderCodec,
}

impl Redactor<ImagePlaceholderEncoder> {
    /// Redactor writing black JPEG placeholders.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: PlaceholderEncoder> Redactor<E> {
    /// Redactor using a custom placeholder encoder.
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            encoder,
            fill: FillColor::BLACK,
            codec: PlaceholderCodec::default(),
        }
    }

    pub fn with_fill(mut self, fill: FillColor) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_codec(mut self, codec: PlaceholderCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Redact the pages chosen by `selector`, writing to `output`.
    ///
    /// `output` may name the input file, in which case it is edited in
    /// place; otherwise it is created (or truncated) as a copy of the input
    /// before any page is touched.
    ///
    /// # Errors
    /// - `NoPagesFound` if the input is not a classic TIFF with at least one IFD
    /// - `MissingRequiredTag`, `MultiStripUnsupported`, `PayloadTooLarge`,
    ///   `EncodingFailed` for the first selected page that cannot be redacted
    /// - `Io` / `Tiff` for I/O and parse failures
    pub fn redact_pages<S>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        selector: &S,
    ) -> Result<RedactionReport, RedactError>
    where
        S: PageSelector + ?Sized,
    {
        let input = input.as_ref();
        let output = output.as_ref();

        let plan = OutputPlan::resolve(input, output)?;
        let in_place = plan.is_in_place();
        let source = ByteStore::open(input, plan.input_mode())?;

        let directories = read_nonempty_directories(&source)?;
        let mut stores = plan.materialize(source)?;

        let pages = self.apply(&mut stores, &directories, selector)?;
        stores.flush()?;

        let report = RedactionReport {
            in_place,
            file_len: stores.target().len(),
            pages,
        };
        info!(
            input = %input.display(),
            output = %output.display(),
            in_place,
            pages = report.pages.len(),
            "Redaction complete"
        );
        Ok(report)
    }

    /// Redact pages across already opened stores.
    ///
    /// The target of a [`StorePair::Distinct`] must already hold a copy of
    /// the source.
    pub fn redact_stores<S>(
        &self,
        stores: &mut StorePair,
        selector: &S,
    ) -> Result<Vec<RedactedPage>, RedactError>
    where
        S: PageSelector + ?Sized,
    {
        let directories = read_nonempty_directories(stores.source())?;
        self.apply(stores, &directories, selector)
    }

    fn apply<S>(
        &self,
        stores: &mut StorePair,
        directories: &[Ifd],
        selector: &S,
    ) -> Result<Vec<RedactedPage>, RedactError>
    where
        S: PageSelector + ?Sized,
    {
        let selected = selector.select(directories);
        debug!(?selected, pages = directories.len(), "Selected pages");

        let mut redacted = Vec::with_capacity(selected.len());
        for index in selected {
            let Some(ifd) = directories.get(index) else {
                warn!(
                    index,
                    pages = directories.len(),
                    "Selected page does not exist, skipping"
                );
                continue;
            };
            redacted.push(self.redact_page(stores, ifd, index)?);
        }
        Ok(redacted)
    }

    fn redact_page(
        &self,
        stores: &mut StorePair,
        ifd: &Ifd,
        page: usize,
    ) -> Result<RedactedPage, RedactError> {
        let [width, height, compression, strip_offsets, strip_byte_counts] =
            TiffTag::REQUIRED_FOR_REDACTION.map(|tag| {
                ifd.get_entry(tag)
                    .ok_or(RedactError::MissingRequiredTag { page, tag })
            });
        // Reported in the order ImageWidth, ImageLength, Compression,
        // StripOffsets, StripByteCounts
        let width_entry = width?;
        let height_entry = height?;
        let compression_entry = compression?;
        let strip_offsets_entry = strip_offsets?;
        let strip_byte_counts_entry = strip_byte_counts?;

        if strip_offsets_entry.count > 1 {
            return Err(RedactError::MultiStripUnsupported {
                page,
                count: strip_offsets_entry.count,
            });
        }

        let byte_order = ifd.byte_order;
        let reader = ValueReader::new(stores.source(), byte_order);
        let width = reader.read_scalar(width_entry)?;
        let height = reader.read_scalar(height_entry)?;
        let previous_compression = reader.read_scalar(compression_entry)?;
        let strip_offset = reader.read_scalar(strip_offsets_entry)? as u64;
        let capacity = reader.read_scalar(strip_byte_counts_entry)? as usize;

        let strip = stores.target_mut().span_mut(strip_offset, capacity)?;
        strip.fill(0);

        let payload = self
            .encoder
            .encode(&PlaceholderRequest {
                width,
                height,
                fill: self.fill,
                codec: self.codec,
            })
            .map_err(|source| RedactError::EncodingFailed { page, source })?;

        if payload.len() > capacity {
            return Err(RedactError::PayloadTooLarge {
                page,
                payload: payload.len(),
                capacity,
            });
        }
        strip[..payload.len()].copy_from_slice(&payload);

        write_no_compression(stores.target_mut(), compression_entry, byte_order)?;

        info!(
            page,
            width,
            height,
            strip_offset,
            capacity,
            payload = payload.len(),
            previous = Compression::name_for(previous_compression),
            "Redacted page"
        );

        Ok(RedactedPage {
            index: page,
            width,
            height,
            strip_offset,
            capacity,
            payload_len: payload.len(),
            previous_compression,
        })
    }
}

/// Redact the macro image (second-to-last page) with black JPEG placeholders.
pub fn redact_macro(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RedactionReport, RedactError> {
    Redactor::new().redact_pages(input, output, &MacroPage)
}

fn read_nonempty_directories(store: &ByteStore) -> Result<Vec<Ifd>, RedactError> {
    let directories = read_directories(store)?;
    if directories.is_empty() {
        return Err(RedactError::NoPagesFound);
    }

    if tracing::enabled!(Level::DEBUG) {
        for (index, ifd) in directories.iter().enumerate() {
            let summary = PageSummary::from_ifd(store, ifd, index);
            debug!(
                index,
                offset = %format!("0x{:08X}", ifd.offset),
                compression = summary.compression_name,
                "IFD"
            );
        }
    }
    Ok(directories)
}

/// Overwrite the Compression value field with 1.
///
/// A Short value is left-justified in the 4-byte field, so it is written as
/// a u16 followed by two zero bytes.
fn write_no_compression(
    store: &mut ByteStore,
    entry: &IfdEntry,
    byte_order: ByteOrder,
) -> Result<(), IoError> {
    let offset = entry.value_field_offset();
    match entry.field_type {
        Some(FieldType::Short) => {
            store.write_u16(offset, NO_COMPRESSION as u16, byte_order)?;
            store.write_u16(offset + 2, 0, byte_order)
        }
        _ => store.write_u32(offset, NO_COMPRESSION, byte_order),
    }
}
