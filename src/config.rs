//! Command-line configuration for wsi-redact.
//!
//! Options can be given as flags or as environment variables with the
//! `WSI_REDACT_` prefix:
//!
//! - `WSI_REDACT_FILL` - Placeholder colour as RRGGBB (default: 000000)
//! - `WSI_REDACT_CODEC` - Placeholder codec, `jpeg` or `png` (default: jpeg)
//! - `WSI_REDACT_JPEG_QUALITY` - JPEG quality (default: 80)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::placeholder::{
    FillColor, PlaceholderCodec, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};

/// Default placeholder colour.
pub const DEFAULT_FILL: &str = "000000";

// =============================================================================
// CLI Arguments
// =============================================================================

/// wsi-redact - Overwrite the macro image of a Whole Slide Image.
///
/// Replaces the pixel data of selected TIFF pages with a solid placeholder,
/// without moving any other byte of the file.
#[derive(Parser, Debug, Clone)]
#[command(name = "wsi-redact")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Redact pages of a slide, in place or into a copy
    Redact(RedactConfig),

    /// List the pages of a slide
    Inspect(InspectConfig),
}

/// Placeholder codec names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecArg {
    #[default]
    Jpeg,
    Png,
}

// =============================================================================
// Redact Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct RedactConfig {
    /// Slide to redact.
    pub input: PathBuf,

    /// Where to write the result. Pass the input path to edit in place.
    pub output: PathBuf,

    /// Page index to redact. Repeatable.
    ///
    /// Without this flag the macro image (second-to-last page) is redacted.
    #[arg(long = "page", value_name = "N")]
    pub pages: Vec<usize>,

    /// Placeholder colour as RRGGBB.
    #[arg(long, default_value = DEFAULT_FILL, env = "WSI_REDACT_FILL")]
    pub fill: String,

    /// Placeholder codec.
    #[arg(long, value_enum, default_value_t = CodecArg::Jpeg, env = "WSI_REDACT_CODEC")]
    pub codec: CodecArg,

    /// JPEG quality for the placeholder (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "WSI_REDACT_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RedactConfig {
    /// Validate the configuration and return an error message if invalid.
    ///
    /// On success returns the parsed fill colour.
    pub fn validate(&self) -> Result<FillColor, String> {
        if !(MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&self.jpeg_quality) {
            return Err(format!(
                "jpeg_quality must be between {} and {}",
                MIN_JPEG_QUALITY, MAX_JPEG_QUALITY
            ));
        }

        self.fill_color()
    }

    pub fn fill_color(&self) -> Result<FillColor, String> {
        self.fill.parse()
    }

    pub fn placeholder_codec(&self) -> PlaceholderCodec {
        match self.codec {
            CodecArg::Jpeg => PlaceholderCodec::Jpeg {
                quality: self.jpeg_quality,
            },
            CodecArg::Png => PlaceholderCodec::Png,
        }
    }

    /// Whether the default macro policy applies.
    pub fn uses_macro_policy(&self) -> bool {
        self.pages.is_empty()
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// Slide to inspect.
    pub input: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
