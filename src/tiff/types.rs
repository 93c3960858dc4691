//! Parsed container of a source file

use crate::io::byte_order::ByteOrder;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use std::fmt;

/// Directories of a source TIFF, in chain order
///
/// Only the first directory is converted. Overviews and further pages are
/// kept for reporting.
#[derive(Debug)]
pub struct TIFF {
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The first directory, which holds the full-resolution raster
    pub fn full_resolution(&self) -> TiffResult<&IFD> {
        self.ifds.first()
            .ok_or_else(|| TiffError::GenericError("No IFDs found in TIFF file".to_string()))
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Directories after the first, split into (overviews, other pages)
    pub fn ignored_ifds(&self) -> (usize, usize) {
        let overviews = self.ifds.iter().skip(1).filter(|ifd| ifd.is_overview()).count();
        (overviews, self.ifd_count().saturating_sub(1) - overviews)
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (overviews, pages) = self.ignored_ifds();
        writeln!(f, "Container:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  IFDs: {} ({} overviews, {} other pages)", self.ifd_count(), overviews, pages)
    }
}
