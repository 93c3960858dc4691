//! Heightmap conversion pipeline
//!
//! Reads the first IFD of a single-band source, encodes every sample as a
//! 24-bit RGB pixel and writes a striped RGB TIFF that carries the source's
//! georeferencing. Every check that can reject the source runs before the
//! destination file is created.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, warn};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::config::Config;
use crate::decoder::{self, OutputFrame};
use crate::encoder::{HeightEncoder, NumericKind};
use crate::io::byte_order::ByteOrder;
use crate::tiff::descriptor::RasterDescriptor;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geo_metadata::GeoMetadataBlock;
use crate::tiff::reader::TiffReader;
use crate::tiff::tag_registry::TagRegistry;
use crate::tiff::TiffBuilder;
use crate::tiff::WriteSummary;
use crate::utils::progress::ProgressTracker;

/// Removes the destination file unless the write completed
///
/// Dropping the guard without calling [`PartialOutputGuard::commit`]
/// deletes the file, so no error path leaves a truncated TIFF behind.
pub struct PartialOutputGuard {
    path: PathBuf,
    committed: bool,
}

impl PartialOutputGuard {
    /// Creates the destination file and arms the guard
    pub fn create(path: &Path) -> TiffResult<(Self, File)> {
        let file = File::create(path)?;
        Ok((PartialOutputGuard { path: path.to_path_buf(), committed: false }, file))
    }

    /// Keeps the file
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialOutputGuard {
    fn drop(&mut self) {
        if !self.committed {
            warn!("Removing incomplete output {}", self.path.display());
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Structure and metadata of a source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
    pub ifd_count: usize,
    pub descriptor: RasterDescriptor,
    pub geo: GeoMetadataBlock,
}

/// Outcome of a completed conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub width: u32,
    pub height: u32,
    pub kind: NumericKind,
    pub strips: usize,
    pub bytes: u64,
    pub big_tiff: bool,
    /// Number of georeferencing blocks copied to the output
    pub geo_blocks: usize,
}

/// Converts single-band elevation TIFFs into RGB-encoded heightmaps
pub struct HeightmapConverter {
    config: Config,
    registry: TagRegistry,
}

impl HeightmapConverter {
    /// Creates a converter with the GDAL tags registered
    pub fn new(config: Config) -> TiffResult<Self> {
        Self::with_registry(config, TagRegistry::with_gdal_tags())
    }

    /// Creates a converter with a caller-provided tag registry
    pub fn with_registry(config: Config, registry: TagRegistry) -> TiffResult<Self> {
        config.validate()?;
        Ok(HeightmapConverter { config, registry })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the descriptor and metadata of `input` without converting it
    pub fn inspect(&self, input: &str) -> TiffResult<SourceInfo> {
        let mut reader = TiffReader::new();
        let mut source = TiffReader::open_source(input)?;
        let tiff = reader.read(&mut source)?;
        let ifd = tiff.full_resolution()?;

        let descriptor = RasterDescriptor::read(&reader, &mut source, ifd)?;
        let geo = GeoMetadataBlock::read(&reader, &mut source, ifd, &self.registry)?;

        Ok(SourceInfo {
            is_big_tiff: tiff.is_big_tiff,
            byte_order: tiff.byte_order,
            ifd_count: tiff.ifd_count(),
            descriptor,
            geo,
        })
    }

    /// Converts `input` into an RGB heightmap at `output`
    ///
    /// On failure no file is left at `output`, except when the source is
    /// rejected before the destination is created, in which case an
    /// existing file there is untouched.
    pub fn convert(&self, input: &str, output: &str) -> TiffResult<ConversionReport> {
        info!("Converting {} -> {}", input, output);

        let mut reader = TiffReader::new();
        let mut source = TiffReader::open_source(input)?;
        let tiff = reader.read(&mut source)?;
        let ifd = tiff.full_resolution()?;
        let (overviews, pages) = tiff.ignored_ifds();
        if overviews + pages > 0 {
            debug!("Ignoring {} overviews and {} further pages", overviews, pages);
        }

        let descriptor = RasterDescriptor::read(&reader, &mut source, ifd)?;
        let geo = GeoMetadataBlock::read(&reader, &mut source, ifd, &self.registry)?;
        let kind = descriptor.numeric_kind()?;
        let codec = CompressionFactory::get_handler_by_name(&self.config.output.compression, self.config.output.zstd_level)?;
        let encoder = HeightEncoder::new(self.config.encoding)?;

        let frame = decoder::decode_frame(&descriptor, &encoder, &mut source, self.config.logging.progress)?;
        drop(source);

        let mut builder = TiffBuilder::new();
        builder.add_rgb_output_tags(frame.width(), frame.height(), codec.code());
        builder.add_geo_tags(&geo);
        builder.add_gdal_tags(&geo, &self.registry);

        let progress = self.progress(frame.height() as u64, "Writing");
        let summary = Self::write_destination(
            Path::new(output),
            &builder,
            &frame,
            codec.as_ref(),
            &progress,
            |file| BufWriter::with_capacity(1024 * 1024, file), // 1MB buffer
            |mut writer: BufWriter<File>| {
                writer.flush()?;
                let file = writer.into_inner().map_err(|e| TiffError::IoError(e.into_error()))?;
                file.sync_all()?;
                Ok(())
            },
        )?;

        info!("Wrote {}x{} heightmap, {} strips, {} bytes", frame.width(), frame.height(), summary.strips, summary.bytes);
        Ok(ConversionReport {
            width: frame.width(),
            height: frame.height(),
            kind,
            strips: summary.strips,
            bytes: summary.bytes,
            big_tiff: summary.big_tiff,
            geo_blocks: geo.present_count(),
        })
    }

    /// Creates `path`, streams the image through `open`'s writer and keeps
    /// the file only when both the write and `finish` succeed
    fn write_destination<W, O, F>(
        path: &Path,
        builder: &TiffBuilder,
        frame: &OutputFrame,
        codec: &dyn CompressionHandler,
        progress: &ProgressTracker,
        open: O,
        finish: F,
    ) -> TiffResult<WriteSummary>
    where
        W: Write + Seek,
        O: FnOnce(File) -> W,
        F: FnOnce(W) -> TiffResult<()>,
    {
        let (guard, file) = PartialOutputGuard::create(path)?;
        let mut writer = open(file);

        let summary = match builder.write(&mut writer, frame, codec, progress) {
            Ok(summary) => summary,
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        finish(writer)?;
        guard.commit();
        progress.finish();
        Ok(summary)
    }

    fn progress(&self, total: u64, description: &str) -> ProgressTracker {
        if self.config.logging.progress {
            ProgressTracker::new(total, description)
        } else {
            ProgressTracker::hidden(total)
        }
    }
}
