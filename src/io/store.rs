//! Memory-mapped byte store.
//!
//! A [`ByteStore`] is a fixed-length, randomly addressable view of a file
//! (or of anonymous memory). The TIFF walker reads directory tables through
//! it and the redaction engine overwrites strips and tag values in place.
//!
//! # Invariants
//!
//! - The length is fixed when the store is created and never changes.
//! - Every access is bounds checked and fails with
//!   [`IoError::RangeOutOfBounds`] instead of touching unmapped memory.
//! - Writes require a store opened with [`AccessMode::ReadWrite`] (or one
//!   created by [`ByteStore::create`] / [`ByteStore::from_bytes`]).

use std::fs::{File, OpenOptions};
use std::ops::Range;
use std::path::Path;

use memmap2::{Mmap, MmapMut};
use tracing::debug;

use crate::error::IoError;

use super::byte_order::ByteOrder;

/// How an existing file is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Map for reading only; writes fail with [`IoError::ReadOnly`]
    ReadOnly,
    /// Map for reading and in-place writing
    ReadWrite,
}

enum Mapping {
    /// Zero-length files cannot be mapped
    Empty,
    ReadOnly(Mmap),
    Writable(MmapMut),
}

/// Fixed-size byte region backed by a memory map.
///
/// Mapping a file is only sound while no other process truncates or
/// rewrites it, so a store must be the only writer of its file for as long
/// as it is alive.
pub struct ByteStore {
    mapping: Mapping,
    identifier: String,
    file_backed: bool,
}

impl ByteStore {
    /// Map an existing file.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self, IoError> {
        let path = path.as_ref();
        let identifier = path.display().to_string();

        let file = OpenOptions::new()
            .read(true)
            .write(mode == AccessMode::ReadWrite)
            .open(path)
            .map_err(|e| IoError::Open {
                path: identifier.clone(),
                message: e.to_string(),
            })?;

        let len = file_len(&file, &identifier)?;
        let mapping = if len == 0 {
            Mapping::Empty
        } else {
            match mode {
                // SAFETY: the store is the exclusive user of the file for its lifetime.
                AccessMode::ReadOnly => Mapping::ReadOnly(
                    unsafe { Mmap::map(&file) }.map_err(|e| map_error(&identifier, e))?,
                ),
                // SAFETY: as above.
                AccessMode::ReadWrite => Mapping::Writable(
                    unsafe { MmapMut::map_mut(&file) }.map_err(|e| map_error(&identifier, e))?,
                ),
            }
        };

        debug!(path = %identifier, len, ?mode, "Mapped store");

        Ok(Self {
            mapping,
            identifier,
            file_backed: true,
        })
    }

    /// Create (or truncate) a file of exactly `len` bytes and map it writable.
    pub fn create(path: impl AsRef<Path>, len: u64) -> Result<Self, IoError> {
        let path = path.as_ref();
        let identifier = path.display().to_string();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| IoError::Open {
                path: identifier.clone(),
                message: e.to_string(),
            })?;

        file.set_len(len).map_err(|e| IoError::Resize {
            path: identifier.clone(),
            len,
            message: e.to_string(),
        })?;

        let mapping = if len == 0 {
            Mapping::Empty
        } else {
            // SAFETY: the file was just created by us and is owned by this store.
            Mapping::Writable(
                unsafe { MmapMut::map_mut(&file) }.map_err(|e| map_error(&identifier, e))?,
            )
        };

        debug!(path = %identifier, len, "Created store");

        Ok(Self {
            mapping,
            identifier,
            file_backed: true,
        })
    }

    /// Build a writable in-memory store holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IoError> {
        let identifier = "memory".to_string();
        let mapping = if bytes.is_empty() {
            Mapping::Empty
        } else {
            let mut map = MmapMut::map_anon(bytes.len()).map_err(|e| map_error(&identifier, e))?;
            map.copy_from_slice(bytes);
            Mapping::Writable(map)
        };

        Ok(Self {
            mapping,
            identifier,
            file_backed: false,
        })
    }

    /// Total length in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the backing file, or `memory` for anonymous stores.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self.mapping, Mapping::ReadOnly(_))
    }

    /// The whole region.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.mapping {
            Mapping::Empty => &[],
            Mapping::ReadOnly(map) => &map[..],
            Mapping::Writable(map) => &map[..],
        }
    }

    fn check_range(&self, offset: u64, len: usize) -> Result<Range<usize>, IoError> {
        let size = self.len();
        let out_of_bounds = IoError::RangeOutOfBounds {
            offset,
            requested: len as u64,
            size,
        };

        match offset.checked_add(len as u64) {
            Some(end) if end <= size => Ok(offset as usize..end as usize),
            _ => Err(out_of_bounds),
        }
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn span(&self, offset: u64, len: usize) -> Result<&[u8], IoError> {
        let range = self.check_range(offset, len)?;
        Ok(&self.as_bytes()[range])
    }

    /// Mutably borrow `len` bytes starting at `offset`.
    pub fn span_mut(&mut self, offset: u64, len: usize) -> Result<&mut [u8], IoError> {
        let range = self.check_range(offset, len)?;
        match &mut self.mapping {
            Mapping::Writable(map) => Ok(&mut map[range]),
            // Only zero-length ranges pass the bounds check on an empty store.
            Mapping::Empty => Ok(&mut []),
            Mapping::ReadOnly(_) => Err(IoError::ReadOnly(self.identifier.clone())),
        }
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8, IoError> {
        Ok(self.span(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: u64, byte_order: ByteOrder) -> Result<u16, IoError> {
        Ok(byte_order.read_u16(self.span(offset, 2)?))
    }

    pub fn read_u32(&self, offset: u64, byte_order: ByteOrder) -> Result<u32, IoError> {
        Ok(byte_order.read_u32(self.span(offset, 4)?))
    }

    pub fn write_u16(
        &mut self,
        offset: u64,
        value: u16,
        byte_order: ByteOrder,
    ) -> Result<(), IoError> {
        self.span_mut(offset, 2)?
            .copy_from_slice(&byte_order.u16_bytes(value));
        Ok(())
    }

    pub fn write_u32(
        &mut self,
        offset: u64,
        value: u32,
        byte_order: ByteOrder,
    ) -> Result<(), IoError> {
        self.span_mut(offset, 4)?
            .copy_from_slice(&byte_order.u32_bytes(value));
        Ok(())
    }

    /// Overwrite this store with the full contents of `other`.
    ///
    /// Both stores must have the same length.
    pub fn copy_from(&mut self, other: &ByteStore) -> Result<(), IoError> {
        if self.len() != other.len() {
            return Err(IoError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }

        let len = other.as_bytes().len();
        self.span_mut(0, len)?.copy_from_slice(other.as_bytes());

        debug!(
            from = %other.identifier,
            to = %self.identifier,
            len,
            "Copied store contents"
        );
        Ok(())
    }

    /// Write dirty pages of a file-backed writable store back to disk.
    pub fn flush(&self) -> Result<(), IoError> {
        match &self.mapping {
            Mapping::Writable(map) if self.file_backed => map.flush().map_err(|e| IoError::Flush {
                path: self.identifier.clone(),
                message: e.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStore")
            .field("identifier", &self.identifier)
            .field("len", &self.len())
            .field("writable", &self.is_writable())
            .finish()
    }
}

fn file_len(file: &File, identifier: &str) -> Result<u64, IoError> {
    file.metadata()
        .map(|meta| meta.len())
        .map_err(|e| IoError::Open {
            path: identifier.to_string(),
            message: e.to_string(),
        })
}

fn map_error(identifier: &str, error: std::io::Error) -> IoError {
    IoError::Map {
        path: identifier.to_string(),
        message: error.to_string(),
    }
}
