//! Decoding of source samples into the encoded output frame
//!
//! This module drives the strip or tile decoder over the whole source,
//! after every unsupported combination has been rejected.

mod frame;
mod predictor;
mod segment;
mod strip_reader;
mod tile_reader;

pub use frame::{OutputFrame, CHANNELS};
pub use predictor::{check_predictor, undo_predictor};
pub use segment::SegmentReader;
pub use strip_reader::StripDecoder;
pub use tile_reader::TileDecoder;

use log::info;

use crate::compression::CompressionFactory;
use crate::encoder::HeightEncoder;
use crate::io::seekable::SeekableReader;
use crate::tiff::descriptor::{Layout, RasterDescriptor};
use crate::tiff::errors::TiffResult;
use crate::tiff::validation;
use crate::utils::progress::ProgressTracker;

/// Decodes the full source image into a freshly allocated frame
///
/// Sample kind, compression and predictor are all checked before the frame
/// is allocated or any segment is read.
pub fn decode_frame(
    descriptor: &RasterDescriptor,
    encoder: &HeightEncoder,
    source: &mut dyn SeekableReader,
    show_progress: bool,
) -> TiffResult<OutputFrame> {
    let kind = descriptor.numeric_kind()?;
    let codec = CompressionFactory::create_handler(descriptor.compression)?;
    check_predictor(descriptor.predictor, kind)?;

    let file_size = validation::get_file_size(source)?;
    let mut frame = OutputFrame::allocate(descriptor.width, descriptor.height, descriptor.orientation)?;
    let mut segments = SegmentReader::new(codec, descriptor.predictor, kind.bytes(), descriptor.byte_order, file_size);

    let total = descriptor.segment_count() as u64;
    let progress = if show_progress {
        ProgressTracker::new(total, "Decoding")
    } else {
        ProgressTracker::hidden(total)
    };

    info!("Encoding {} samples as 24-bit RGB", kind);
    let result = match descriptor.layout {
        Layout::Strips { .. } => StripDecoder::new(descriptor, encoder, kind)
            .decode(source, &mut segments, &mut frame, &progress),
        Layout::Tiles { .. } => TileDecoder::new(descriptor, encoder, kind)
            .decode(source, &mut segments, &mut frame, &progress),
    };

    match result {
        Ok(()) => {
            progress.finish();
            Ok(frame)
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}
