//! File header parsing
//!
//! Classic TIFF and BigTIFF share the byte order mark; they differ in the
//! version word and in the width of the first IFD offset.

use log::debug;
use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::header;
use crate::tiff::validation;
use crate::utils::ifd_utils;

/// Everything the 8 or 16 header bytes tell us
pub struct SourceHeader {
    pub handler: Box<dyn ByteOrderHandler>,
    pub is_big_tiff: bool,
    pub first_ifd_offset: u64,
}

impl SourceHeader {
    pub fn byte_order(&self) -> ByteOrder {
        self.handler.byte_order()
    }
}

/// Parses the header; `reader` must be positioned at offset 0
///
/// Leaves the reader just past the first IFD offset.
pub fn read_header(reader: &mut dyn SeekableReader) -> TiffResult<SourceHeader> {
    let byte_order = ByteOrder::detect(reader)?;
    let handler = byte_order.create_handler();

    let version = handler.read_u16(reader)?;
    let is_big_tiff = match version {
        header::BIG_TIFF_VERSION => {
            validation::validate_bigtiff_header(reader, handler.as_ref())?;
            true
        }
        header::TIFF_VERSION => false,
        _ => return Err(TiffError::UnsupportedVersion(version)),
    };

    let first_ifd_offset = ifd_utils::read_next_ifd_offset(reader, is_big_tiff, handler.as_ref())?;
    debug!("Header: {}, version {}, first IFD at {}", byte_order.name(), version, first_ifd_offset);

    Ok(SourceHeader { handler, is_big_tiff, first_ifd_offset })
}
