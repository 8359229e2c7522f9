//! Solid-colour placeholder encoder.
//!
//! The redaction engine only needs "an encoded image of this size in one
//! colour". [`PlaceholderEncoder`] is that seam; [`ImagePlaceholderEncoder`]
//! is the default implementation on top of the `image` crate.

use std::str::FromStr;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::error::EncodeError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Largest side the JPEG format can describe.
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Upper bound on the raw RGB buffer allocated for one placeholder.
const MAX_PLACEHOLDER_BUFFER: u64 = 1 << 30;

// =============================================================================
// Request Types
// =============================================================================

/// Codec used for the placeholder payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderCodec {
    Jpeg { quality: u8 },
    Png,
}

impl Default for PlaceholderCodec {
    fn default() -> Self {
        PlaceholderCodec::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// An RGB fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillColor(pub [u8; 3]);

impl FillColor {
    pub const BLACK: FillColor = FillColor([0, 0, 0]);
}

impl FromStr for FillColor {
    type Err = String;

    /// Parse `RRGGBB`, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid colour '{}', expected RRGGBB", s));
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(FillColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

/// What the engine asks the collaborator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRequest {
    pub width: u32,
    pub height: u32,
    pub fill: FillColor,
    pub codec: PlaceholderCodec,
}

// =============================================================================
// Encoder Trait
// =============================================================================

/// Produces the encoded bytes written over a redacted strip.
pub trait PlaceholderEncoder {
    fn encode(&self, request: &PlaceholderRequest) -> Result<Bytes, EncodeError>;
}

impl<F> PlaceholderEncoder for F
where
    F: Fn(&PlaceholderRequest) -> Result<Bytes, EncodeError>,
{
    fn encode(&self, request: &PlaceholderRequest) -> Result<Bytes, EncodeError> {
        self(request)
    }
}

// =============================================================================
// image-based Encoder
// =============================================================================

/// Encodes solid images with the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImagePlaceholderEncoder {}

impl ImagePlaceholderEncoder {
    pub fn new() -> Self {
        Self {}
    }

    fn check_dimensions(request: &PlaceholderRequest) -> Result<(), EncodeError> {
        let invalid = EncodeError::InvalidDimensions {
            width: request.width,
            height: request.height,
        };

        if request.width == 0 || request.height == 0 {
            return Err(invalid);
        }
        if matches!(request.codec, PlaceholderCodec::Jpeg { .. })
            && (request.width > MAX_JPEG_DIMENSION || request.height > MAX_JPEG_DIMENSION)
        {
            return Err(invalid);
        }

        let buffer = request.width as u64 * request.height as u64 * 3;
        if buffer > MAX_PLACEHOLDER_BUFFER {
            return Err(invalid);
        }
        Ok(())
    }
}

impl PlaceholderEncoder for ImagePlaceholderEncoder {
    fn encode(&self, request: &PlaceholderRequest) -> Result<Bytes, EncodeError> {
        Self::check_dimensions(request)?;

        let img = RgbImage::from_pixel(request.width, request.height, Rgb(request.fill.0));
        let mut output = Vec::new();

        let result = match request.codec {
            PlaceholderCodec::Jpeg { quality } => {
                let quality = quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY);
                JpegEncoder::new_with_quality(&mut output, quality).encode_image(&img)
            }
            PlaceholderCodec::Png => PngEncoder::new(&mut output).write_image(
                img.as_raw(),
                request.width,
                request.height,
                ExtendedColorType::Rgb8,
            ),
        };

        result.map_err(|e| EncodeError::Encode {
            message: e.to_string(),
        })?;

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Tests
// =============================================================================
