//! IFD utilities
//!
//! Utilities for working with Image File Directories (IFDs) in TIFF files.

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};

/// Reads the next IFD offset
///
/// # Returns
/// The offset to the next IFD, or 0 if there are no more IFDs
pub fn read_next_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    read_offset(reader, is_big_tiff, byte_order_handler)
}

fn read_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> TiffResult<u64> {
    if is_big_tiff {
        byte_order_handler.read_u64(reader).map_err(TiffError::IoError)
    } else {
        byte_order_handler.read_u32(reader)
            .map(|v| v as u64)
            .map_err(TiffError::IoError)
    }
}

/// Calculates the size of an IFD in bytes
///
/// # Arguments
/// * `entry_count` - Number of entries in the IFD
/// * `is_big_tiff` - Whether the file is in BigTIFF format
///
/// # Returns
/// The size of the IFD in bytes, including the next-IFD offset
pub fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    if is_big_tiff {
        // 8 (entry count) + 20 (each entry) + 8 (next IFD offset)
        8 + (20 * entry_count as u64) + 8
    } else {
        // 2 (entry count) + 12 (each entry) + 4 (next IFD offset)
        2 + (12 * entry_count as u64) + 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifd_size() {
        assert_eq!(calculate_ifd_size(10, false), 126);
        assert_eq!(calculate_ifd_size(10, true), 216);
    }
}
