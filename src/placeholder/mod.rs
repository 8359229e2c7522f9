//! Placeholder images written over redacted strips.

mod encoder;

pub use encoder::{
    FillColor, ImagePlaceholderEncoder, PlaceholderCodec, PlaceholderEncoder, PlaceholderRequest,
    DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
