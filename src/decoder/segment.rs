//! Reading and decompressing one strip or tile

use std::io::SeekFrom;
use log::trace;

use crate::compression::CompressionHandler;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::validation;
use super::predictor;

/// Reads encoded segments through one reused buffer
pub struct SegmentReader {
    codec: Box<dyn CompressionHandler>,
    predictor: u16,
    bytes_per_sample: usize,
    byte_order: ByteOrder,
    file_size: u64,
    /// Encoded bytes of the current segment, reused across segments
    buffer: Vec<u8>,
}

impl SegmentReader {
    pub fn new(
        codec: Box<dyn CompressionHandler>,
        predictor: u16,
        bytes_per_sample: usize,
        byte_order: ByteOrder,
        file_size: u64,
    ) -> Self {
        SegmentReader {
            codec,
            predictor,
            bytes_per_sample,
            byte_order,
            file_size,
            buffer: Vec::new(),
        }
    }

    /// Reads segment `index` and returns its decoded bytes
    ///
    /// The result holds at least `expected` bytes of whole rows of
    /// `row_samples` samples with the predictor already reversed; a short
    /// segment is an error naming the index.
    pub fn read(
        &mut self,
        source: &mut dyn SeekableReader,
        index: usize,
        offset: u64,
        byte_count: u64,
        row_samples: usize,
        expected: usize,
    ) -> TiffResult<Vec<u8>> {
        validation::validate_segment(index, offset, byte_count, self.file_size)?;

        let len = byte_count as usize;
        if len > self.buffer.capacity() {
            self.buffer.try_reserve_exact(len - self.buffer.len())
                .map_err(|_| TiffError::Allocation { what: "strip buffer", bytes: len })?;
        }
        self.buffer.resize(len, 0);

        source.seek(SeekFrom::Start(offset))
            .and_then(|_| source.read_exact(&mut self.buffer))
            .map_err(|e| TiffError::StripRead { strip: index, message: e.to_string() })?;

        let mut decoded = self.codec.decompress(&self.buffer)
            .map_err(|e| TiffError::StripRead { strip: index, message: e.to_string() })?;
        trace!("Segment {}: {} encoded bytes, {} decoded", index, len, decoded.len());

        if decoded.len() < expected {
            return Err(TiffError::StripRead {
                strip: index,
                message: format!("decoded {} bytes, expected {}", decoded.len(), expected),
            });
        }
        decoded.truncate(expected);

        predictor::undo_predictor(&mut decoded, self.predictor, row_samples, self.bytes_per_sample, self.byte_order)?;
        Ok(decoded)
    }

    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }
}
