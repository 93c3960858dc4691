//! Strip-based sample decoding
//!
//! Walks every strip of a stripped source in order, decodes it and encodes
//! each sample into the output frame.

use log::{debug, info};

use crate::encoder::{HeightEncoder, NumericKind};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::descriptor::RasterDescriptor;
use crate::tiff::errors::TiffResult;
use crate::utils::progress::ProgressTracker;

use super::frame::OutputFrame;
use super::segment::SegmentReader;

/// Decodes stripped image data into an [`OutputFrame`]
pub struct StripDecoder<'a> {
    descriptor: &'a RasterDescriptor,
    encoder: &'a HeightEncoder,
    kind: NumericKind,
    handler: Box<dyn ByteOrderHandler>,
}

impl<'a> StripDecoder<'a> {
    pub fn new(descriptor: &'a RasterDescriptor, encoder: &'a HeightEncoder, kind: NumericKind) -> Self {
        StripDecoder {
            descriptor,
            encoder,
            kind,
            handler: descriptor.byte_order.create_handler(),
        }
    }

    /// Decodes strips 0..n in sequence
    ///
    /// The first failing strip stops the run; its index is in the error.
    pub fn decode(
        &self,
        source: &mut dyn SeekableReader,
        segments: &mut SegmentReader,
        frame: &mut OutputFrame,
        progress: &ProgressTracker,
    ) -> TiffResult<()> {
        let width = self.descriptor.width as usize;
        let bytes_per_sample = self.kind.bytes();
        let strip_count = self.descriptor.segment_count();
        let mut first_row = 0u32;

        info!("Decoding {} strips ({})", strip_count, segments.codec_name());

        for strip in 0..strip_count {
            let rows = self.descriptor.rows_in_strip(strip);
            let samples = rows as usize * width;
            debug!("Strip {}: rows {}..{}", strip, first_row, first_row + rows);

            let data = segments.read(
                source,
                strip,
                self.descriptor.segment_offsets[strip],
                self.descriptor.segment_byte_counts[strip],
                width,
                samples * bytes_per_sample,
            )?;

            for (i, raw) in data.chunks_exact(bytes_per_sample).enumerate() {
                let x = (i % width) as u32;
                let y = first_row + (i / width) as u32;
                let sample = self.kind.read_sample(raw, self.handler.as_ref());
                frame.put(x, y, self.encoder.encode(sample));
            }

            first_row += rows;
            progress.increment(1);
        }

        Ok(())
    }
}
