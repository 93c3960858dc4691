//! TIFF writing utilities
//!
//! Helper functions for writing TIFF files to disk, handling alignment
//! and entry ordering.

use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFDEntry;
use std::collections::HashSet;
use std::io::Write;

/// Align an offset to a 4-byte boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    offset + calculate_padding(offset)
}

/// Calculate padding required to align to 4-byte boundary
pub fn calculate_padding(position: u64) -> u64 {
    (4 - (position % 4)) % 4
}

/// Write zero bytes until `position` is 4-byte aligned, returning the new position
pub fn write_padding(writer: &mut impl Write, position: u64) -> TiffResult<u64> {
    let padding = calculate_padding(position);
    if padding > 0 {
        writer.write_all(&[0u8; 4][..padding as usize])?;
    }
    Ok(position + padding)
}

/// Get a list of IFD entries sorted by tag number with duplicates removed
///
/// TIFF requires tags in ascending order, each appearing once. If multiple
/// entries have the same tag, only the last occurrence is kept.
pub fn get_unique_sorted_entries(entries: &[IFDEntry]) -> Vec<IFDEntry> {
    let mut unique_entries = Vec::with_capacity(entries.len());
    let mut seen_tags = HashSet::new();

    for entry in entries.iter().rev() {
        if seen_tags.insert(entry.tag) {
            unique_entries.push(entry.clone());
        }
    }

    unique_entries.sort_by_key(|entry| entry.tag);
    unique_entries
}

/// Sink that accepts `remaining` bytes and then fails like a full disk
#[cfg(test)]
pub(crate) struct FailAfter<W> {
    pub inner: W,
    pub remaining: usize,
}

#[cfg(test)]
impl<W: Write> Write for FailAfter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if buf.len() > self.remaining {
            return Err(std::io::Error::other("disk full"));
        }
        self.remaining -= buf.len();
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
impl<W: std::io::Seek> std::io::Seek for FailAfter<W> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}
