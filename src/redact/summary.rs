//! Read-only page listing.
//!
//! Used by the `inspect` command and by the engine's debug log to show what
//! a file contains before anything is overwritten.

use std::path::Path;

use serde::Serialize;

use crate::error::RedactError;
use crate::format::tiff::{read_directories, Compression, Ifd, TiffHeader, TiffTag, ValueReader};
use crate::io::{AccessMode, ByteStore};

use super::policy::{MacroPage, PageSelector};

/// One IFD as seen by `inspect`.
///
/// Values that are missing or cannot be resolved are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub index: usize,
    /// Absolute offset of the IFD
    pub offset: u64,
    pub entries: usize,
    pub compression: Option<u32>,
    pub compression_name: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Number of strips, from the StripOffsets count
    pub strips: Option<u32>,
    /// Whether the default policy would redact this page
    pub is_macro: bool,
}

impl PageSummary {
    pub fn from_ifd(store: &ByteStore, ifd: &Ifd, index: usize) -> Self {
        let reader = ValueReader::new(store, ifd.byte_order);
        let scalar = |tag: TiffTag| {
            ifd.get_entry(tag)
                .and_then(|entry| reader.read_scalar(entry).ok())
        };

        let compression = scalar(TiffTag::Compression);
        PageSummary {
            index,
            offset: ifd.offset,
            entries: ifd.entry_count(),
            compression,
            compression_name: compression.map_or("-", Compression::name_for),
            width: scalar(TiffTag::ImageWidth),
            height: scalar(TiffTag::ImageLength),
            strips: ifd.get_entry(TiffTag::StripOffsets).map(|entry| entry.count),
            is_macro: false,
        }
    }
}

/// Everything `inspect` reports about a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideSummary {
    pub path: String,
    pub file_len: u64,
    /// "II" or "MM"
    pub byte_order: &'static str,
    pub pages: Vec<PageSummary>,
}

impl SlideSummary {
    /// Summarize an opened store.
    ///
    /// # Errors
    /// `NoPagesFound` if the store holds no classic TIFF directories.
    pub fn from_store(store: &ByteStore) -> Result<Self, RedactError> {
        let directories = read_directories(store)?;
        if directories.is_empty() {
            return Err(RedactError::NoPagesFound);
        }
        let header = TiffHeader::read(store)?;

        let macro_pages = MacroPage.select(&directories);
        let pages = directories
            .iter()
            .enumerate()
            .map(|(index, ifd)| PageSummary {
                is_macro: macro_pages.contains(&index),
                ..PageSummary::from_ifd(store, ifd, index)
            })
            .collect();

        Ok(SlideSummary {
            path: store.identifier().to_string(),
            file_len: store.len(),
            byte_order: header.byte_order.name(),
            pages,
        })
    }

    /// Open `path` read-only and summarize it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RedactError> {
        let store = ByteStore::open(path, AccessMode::ReadOnly)?;
        Self::from_store(&store)
    }

    /// Plain-text table, one line per page.
    pub fn to_table(&self) -> String {
        let mut out = format!(
            "{} ({} bytes, {})\n{:>5}  {:>10}  {:<8}  {:>7}  {:>7}  {:>6}\n",
            self.path, self.file_len, self.byte_order, "Index", "Offset", "Codec", "Width",
            "Height", "Strips"
        );
        let dash = || "-".to_string();
        for page in &self.pages {
            out.push_str(&format!(
                "{:>5}  0x{:08X}  {:<8}  {:>7}  {:>7}  {:>6}{}\n",
                page.index,
                page.offset,
                page.compression_name,
                page.width.map_or_else(dash, |v| v.to_string()),
                page.height.map_or_else(dash, |v| v.to_string()),
                page.strips.map_or_else(dash, |v| v.to_string()),
                if page.is_macro { "  macro" } else { "" },
            ));
        }
        out
    }
}
