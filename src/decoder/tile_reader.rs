//! Tile-based sample decoding
//!
//! Same contract as the strip decoder over tiled sources. Tiles are visited
//! in index order (left to right, then top to bottom); the padding of edge
//! tiles beyond the image is discarded.

use log::{debug, info};

use crate::encoder::{HeightEncoder, NumericKind};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::descriptor::{Layout, RasterDescriptor};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::progress::ProgressTracker;

use super::frame::OutputFrame;
use super::segment::SegmentReader;

/// Decodes tiled image data into an [`OutputFrame`]
pub struct TileDecoder<'a> {
    descriptor: &'a RasterDescriptor,
    encoder: &'a HeightEncoder,
    kind: NumericKind,
    handler: Box<dyn ByteOrderHandler>,
}

impl<'a> TileDecoder<'a> {
    pub fn new(descriptor: &'a RasterDescriptor, encoder: &'a HeightEncoder, kind: NumericKind) -> Self {
        TileDecoder {
            descriptor,
            encoder,
            kind,
            handler: descriptor.byte_order.create_handler(),
        }
    }

    pub fn decode(
        &self,
        source: &mut dyn SeekableReader,
        segments: &mut SegmentReader,
        frame: &mut OutputFrame,
        progress: &ProgressTracker,
    ) -> TiffResult<()> {
        let Layout::Tiles { tile_width, tile_length } = self.descriptor.layout else {
            return Err(TiffError::UnsupportedLayout("tile decoder used on a stripped image".to_string()));
        };

        let tiles_across = self.descriptor.width.div_ceil(tile_width);
        let tile_count = self.descriptor.segment_count();
        let bytes_per_sample = self.kind.bytes();
        let tile_samples = tile_width as usize * tile_length as usize;

        info!("Decoding {} tiles of {}x{} ({})", tile_count, tile_width, tile_length, segments.codec_name());

        for tile in 0..tile_count {
            let origin_x = (tile as u32 % tiles_across) * tile_width;
            let origin_y = (tile as u32 / tiles_across) * tile_length;
            debug!("Tile {} at ({}, {})", tile, origin_x, origin_y);

            let data = segments.read(
                source,
                tile,
                self.descriptor.segment_offsets[tile],
                self.descriptor.segment_byte_counts[tile],
                tile_width as usize,
                tile_samples * bytes_per_sample,
            )?;

            let visible_width = tile_width.min(self.descriptor.width - origin_x) as usize;
            let visible_rows = tile_length.min(self.descriptor.height - origin_y);
            let row_bytes = tile_width as usize * bytes_per_sample;

            for row in 0..visible_rows {
                let start = row as usize * row_bytes;
                let row_data = &data[start..start + visible_width * bytes_per_sample];

                for (col, raw) in row_data.chunks_exact(bytes_per_sample).enumerate() {
                    let sample = self.kind.read_sample(raw, self.handler.as_ref());
                    frame.put(origin_x + col as u32, origin_y + row, self.encoder.encode(sample));
                }
            }

            progress.increment(1);
        }

        Ok(())
    }
}
