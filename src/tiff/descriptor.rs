//! Raster descriptor
//!
//! Geometry and sample layout of the full-resolution image, read once from
//! the first IFD and passed by reference to the decoders and the writer.

use std::fmt;
use log::{debug, info};

use crate::encoder::NumericKind;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, orientation, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::tiff_code_translators;

/// How the encoded image data is partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Horizontal bands of whole rows
    Strips { rows_per_strip: u32 },
    /// Rectangular blocks
    Tiles { tile_width: u32, tile_length: u32 },
}

/// Source geometry and sample layout
#[derive(Debug, Clone)]
pub struct RasterDescriptor {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub sample_format: u16,
    pub planar_config: u16,
    pub compression: u64,
    pub predictor: u16,
    pub orientation: u16,
    pub byte_order: ByteOrder,
    pub is_big_tiff: bool,
    pub layout: Layout,
    /// Strip or tile offsets, in index order
    pub segment_offsets: Vec<u64>,
    /// Strip or tile byte counts, in index order
    pub segment_byte_counts: Vec<u64>,
}

impl RasterDescriptor {
    /// Reads the descriptor from the main IFD
    ///
    /// Fails before any output exists when the image is not single-band,
    /// declares zero rows per strip, stores samples in separate planes or
    /// uses a transposed orientation.
    pub fn read(reader: &TiffReader, source: &mut dyn SeekableReader, ifd: &IFD) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        if width == 0 || height == 0 || width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(TiffError::Precondition {
                invariant: "image width and height in 1..=4294967295",
                found: format!("{}x{}", width, height),
            });
        }
        let (width, height) = (width as u32, height as u32);

        let samples_per_pixel = Self::short_tag(ifd, tags::SAMPLES_PER_PIXEL, 1)?;
        if samples_per_pixel != 1 {
            return Err(TiffError::Precondition {
                invariant: "samples per pixel == 1",
                found: samples_per_pixel.to_string(),
            });
        }

        let bits_per_sample = match ifd.get_entry(tags::BITS_PER_SAMPLE) {
            Some(_) => {
                let values = reader.read_tag_shorts(source, ifd, tags::BITS_PER_SAMPLE)?;
                values.first().copied().unwrap_or(1)
            }
            None => 1,
        };

        let sample_format = match ifd.get_entry(tags::SAMPLE_FORMAT) {
            Some(_) => {
                let values = reader.read_tag_shorts(source, ifd, tags::SAMPLE_FORMAT)?;
                values.first().copied().unwrap_or(sample_format::UNSIGNED)
            }
            None => sample_format::UNSIGNED,
        };

        let planar_config = Self::short_tag(ifd, tags::PLANAR_CONFIGURATION, planar_config::CHUNKY)?;
        if planar_config != planar_config::CHUNKY {
            return Err(TiffError::UnsupportedLayout(format!(
                "planar configuration {} ({})", planar_config,
                tiff_code_translators::planar_config_code_to_name(planar_config as u64))));
        }

        let orientation = Self::short_tag(ifd, tags::ORIENTATION, orientation::TOP_LEFT)?;
        if !(orientation::TOP_LEFT..=orientation::BOTTOM_LEFT).contains(&orientation) {
            return Err(TiffError::UnsupportedLayout(format!(
                "orientation {} ({})", orientation,
                tiff_code_translators::orientation_code_to_name(orientation as u64))));
        }

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE as u64);
        let predictor = Self::short_tag(ifd, tags::PREDICTOR, predictor::NONE)?;

        let (layout, offset_tag, count_tag) = if ifd.is_tiled() {
            let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0);
            let tile_length = ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0);
            if tile_width == 0 || tile_length == 0 || tile_width > u32::MAX as u64 || tile_length > u32::MAX as u64 {
                return Err(TiffError::Precondition {
                    invariant: "tile width and length > 0",
                    found: format!("{}x{}", tile_width, tile_length),
                });
            }
            let layout = Layout::Tiles { tile_width: tile_width as u32, tile_length: tile_length as u32 };
            (layout, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
                .unwrap_or(height as u64)
                .min(height as u64);
            if rows_per_strip == 0 {
                return Err(TiffError::Precondition {
                    invariant: "rows per strip > 0",
                    found: "0".to_string(),
                });
            }
            let layout = Layout::Strips { rows_per_strip: rows_per_strip as u32 };
            (layout, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };

        let segment_offsets = reader.read_tag_values(source, ifd, offset_tag)?;
        let segment_byte_counts = reader.read_tag_values(source, ifd, count_tag)?;

        let descriptor = RasterDescriptor {
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            sample_format,
            planar_config,
            compression,
            predictor,
            orientation,
            byte_order: reader.byte_order().unwrap_or(ByteOrder::LittleEndian),
            is_big_tiff: reader.is_big_tiff(),
            layout,
            segment_offsets,
            segment_byte_counts,
        };

        descriptor.check_segments()?;
        info!("Source raster: {}x{}, {} bits, {}, {:?}",
              width, height, bits_per_sample,
              tiff_code_translators::sample_format_code_to_name(sample_format as u64), layout);
        debug!("Compression {} ({}), predictor {}, orientation {}",
               compression, tiff_code_translators::compression_code_to_name(compression),
               predictor, orientation);

        Ok(descriptor)
    }

    /// Reads a single SHORT-sized value with a baseline default
    fn short_tag(ifd: &IFD, tag: u16, default: u16) -> TiffResult<u16> {
        match ifd.get_tag_value(tag) {
            Some(value) => u16::try_from(value).map_err(|_| TiffError::GenericError(
                format!("Tag {} value {} does not fit in 16 bits", tag, value))),
            None => Ok(default),
        }
    }

    /// Offset and byte count arrays must cover every segment
    fn check_segments(&self) -> TiffResult<()> {
        let expected = self.segment_count();
        if self.segment_offsets.len() < expected || self.segment_byte_counts.len() < expected {
            return Err(TiffError::GenericError(format!(
                "expected {} segments, found {} offsets and {} byte counts",
                expected, self.segment_offsets.len(), self.segment_byte_counts.len())));
        }
        Ok(())
    }

    /// Numeric kind of the samples, or an unsupported-format error
    pub fn numeric_kind(&self) -> TiffResult<NumericKind> {
        NumericKind::resolve(self.sample_format, self.bits_per_sample)
    }

    /// Bytes per sample, rounding partial bytes up
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample as usize).div_ceil(8)
    }

    pub fn is_tiled(&self) -> bool {
        matches!(self.layout, Layout::Tiles { .. })
    }

    /// Number of strips or tiles the image is divided into
    pub fn segment_count(&self) -> usize {
        match self.layout {
            Layout::Strips { rows_per_strip } => self.height.div_ceil(rows_per_strip) as usize,
            Layout::Tiles { tile_width, tile_length } => {
                self.width.div_ceil(tile_width) as usize * self.height.div_ceil(tile_length) as usize
            }
        }
    }

    /// Rows covered by strip `strip`; the last strip may be short
    pub fn rows_in_strip(&self, strip: usize) -> u32 {
        match self.layout {
            Layout::Strips { rows_per_strip } => {
                let start = strip as u64 * rows_per_strip as u64;
                let end = (start + rows_per_strip as u64).min(self.height as u64);
                end.saturating_sub(start) as u32
            }
            Layout::Tiles { .. } => 0,
        }
    }

    /// Total source pixels
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for RasterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster:")?;
        writeln!(f, "  Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "  Format: {}, {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" }, self.byte_order.name())?;
        writeln!(f, "  Bits per sample: {}", self.bits_per_sample)?;
        writeln!(f, "  Samples per pixel: {}", self.samples_per_pixel)?;
        writeln!(f, "  Sample format: {} ({})", self.sample_format,
                 tiff_code_translators::sample_format_code_to_name(self.sample_format as u64))?;
        writeln!(f, "  Compression: {} ({})", self.compression,
                 tiff_code_translators::compression_code_to_name(self.compression))?;
        writeln!(f, "  Predictor: {} ({})", self.predictor,
                 tiff_code_translators::predictor_code_to_name(self.predictor as u64))?;
        writeln!(f, "  Orientation: {} ({})", self.orientation,
                 tiff_code_translators::orientation_code_to_name(self.orientation as u64))?;
        match self.layout {
            Layout::Strips { rows_per_strip } => writeln!(f, "  Layout: {} strips of {} rows",
                                                          self.segment_count(), rows_per_strip)?,
            Layout::Tiles { tile_width, tile_length } => writeln!(f, "  Layout: {} tiles of {}x{}",
                                                                  self.segment_count(), tile_width, tile_length)?,
        }
        Ok(())
    }
}
