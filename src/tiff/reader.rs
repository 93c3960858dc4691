//! TIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF file reader that uses the
//! Strategy pattern to handle different byte orders.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::constants::field_types;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;
use crate::utils::format_utils;
use crate::utils::ifd_utils;
use crate::utils::tag_utils;
use crate::utils::string_utils;

/// Upper bound on the IFD chain length, guards against offset loops
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    /// Opens the given path for buffered reading
    pub fn open_source(path: &str) -> TiffResult<BufReader<File>> {
        let file = File::open(Path::new(path))?;
        Ok(BufReader::with_capacity(1024 * 1024, file)) // 1MB buffer
    }

    /// Returns the byte order handler, with proper error handling for None case
    pub fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads a TIFF file from the given reader
    ///
    /// This method handles the core process of reading a TIFF file:
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Read all IFDs (Image File Directories)
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let header = format_utils::read_header(reader)?;
        let byte_order = header.byte_order();
        let (is_big_tiff, first_ifd_offset) = (header.is_big_tiff, header.first_ifd_offset);
        self.byte_order_handler = Some(header.handler);
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("No IFDs found in TIFF file".to_string()));
        }

        info!("Read {} IFDs ({}, {})", tiff.ifds.len(),
              if is_big_tiff { "BigTIFF" } else { "TIFF" }, byte_order.name());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A failure in the first IFD is fatal; later IFDs are overviews, so a
    /// broken link there only truncates the chain.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // read_ifd leaves the reader positioned at the next-IFD offset field
            let next_ifd_offset = match ifd_utils::read_next_ifd_offset(reader, self.is_big_tiff, self.handler()?) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);

            if next_ifd_offset != 0 && (next_ifd_offset >= file_size || next_ifd_offset < 8) {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD from the reader
    ///
    /// # Arguments
    /// * `reader` - The seekable reader to use
    /// * `offset` - Offset in the file where the IFD starts
    /// * `number` - The index of this IFD in the file
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = self.read_ifd_entry_count(reader)?;
        debug!("IFD #{} entry count: {}", number, entry_count);

        let mut ifd = IFD::new(number, offset);

        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads the entry count from an IFD
    fn read_ifd_entry_count(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u16(reader)? as u64)
        }
    }

    /// Reads a single IFD entry
    ///
    /// The value field is kept as raw bytes when the values fit inline, so
    /// short values are decoded with the file's byte order instead of being
    /// misread as a full-width offset.
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let field_len = if self.is_big_tiff { 8 } else { 4 };
        let mut raw = [0u8; 8];
        reader.read_exact(&mut raw[..field_len])?;

        let sizing = IFDEntry::new(tag, field_type, count, 0);
        if sizing.is_value_inline(self.is_big_tiff) {
            let size = sizing.data_size() as usize;
            let value = Self::first_inline_value(&raw, field_type, handler);
            Ok(IFDEntry::new(tag, field_type, count, value).with_inline_data(raw[..size].to_vec()))
        } else {
            let offset = if self.is_big_tiff {
                handler.u64_from(&raw)
            } else {
                handler.u32_from(&raw) as u64
            };
            Ok(IFDEntry::new(tag, field_type, count, offset))
        }
    }

    /// Decodes the first value of an inline field
    fn first_inline_value(raw: &[u8; 8], field_type: u16, handler: &dyn ByteOrderHandler) -> u64 {
        match field_type {
            field_types::SHORT | field_types::SSHORT => handler.u16_from(raw) as u64,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => handler.u32_from(raw) as u64,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 | field_types::DOUBLE
            | field_types::RATIONAL | field_types::SRATIONAL => handler.u64_from(raw),
            _ => raw[0] as u64,
        }
    }

    /// Reads the raw value bytes of an entry, in file byte order
    pub fn read_entry_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        if let Some(data) = &entry.inline_data {
            return Ok(data.clone());
        }

        let size = entry.data_size();
        let file_size = validation::get_file_size(reader)?;
        if entry.value_offset.saturating_add(size) > file_size {
            return Err(TiffError::GenericError(format!(
                "Tag {} data ({} bytes at offset {}) extends past end of file ({} bytes)",
                entry.tag, size, entry.value_offset, file_size)));
        }

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(size as usize)
            .map_err(|_| TiffError::Allocation { what: "tag data", bytes: size as usize })?;
        buffer.resize(size as usize, 0);

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a tag's value as a vector of u64
    ///
    /// # Arguments
    /// * `reader` - The seekable reader to use
    /// * `ifd` - The IFD containing the tag
    /// * `tag` - The tag number to read
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        let data = self.read_entry_bytes(reader, entry)?;
        tag_utils::decode_integer_values(&data, entry.field_type, self.handler()?)
    }

    /// Reads a tag's values as doubles
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        let data = self.read_entry_bytes(reader, entry)?;
        tag_utils::decode_float_values(&data, entry.field_type, self.handler()?)
    }

    /// Reads a tag's values as 16-bit codes
    pub fn read_tag_shorts(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u16>> {
        let values = self.read_tag_values(reader, ifd, tag)?;
        values.into_iter()
            .map(|v| u16::try_from(v)
                .map_err(|_| TiffError::GenericError(format!("Tag {} value {} does not fit in 16 bits", tag, v))))
            .collect()
    }

    /// Reads the bytes of an ASCII tag without interpreting them
    ///
    /// Trailing NUL terminators are removed. TIFF ASCII is 7-bit in theory;
    /// real files carry Latin-1 and other encodings, which are kept as is.
    pub fn read_tag_ascii_bytes(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u8>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        let mut buffer = self.read_entry_bytes(reader, entry)?;
        string_utils::trim_trailing_nulls(&mut buffer);
        Ok(buffer)
    }

    /// Reads an ASCII tag as a string
    ///
    /// Fails when the value is not valid UTF-8.
    pub fn read_tag_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let buffer = self.read_tag_ascii_bytes(reader, ifd, tag)?;
        String::from_utf8(buffer)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string in tag {}: {}", tag, e)))
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Returns the detected byte order, if a file has been read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|h| h.byte_order())
    }
}
