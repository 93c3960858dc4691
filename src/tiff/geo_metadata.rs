//! Geospatial referencing metadata
//!
//! The block of GeoTIFF and GDAL tags carried from source to destination.
//! Values are kept exactly as read so the writer can reproduce them.

use std::fmt;
use log::{debug, warn};

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::tag_registry::TagRegistry;

/// Geospatial tags of the source image; every block is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoMetadataBlock {
    pub pixel_scale: Option<Vec<f64>>,
    pub tie_points: Option<Vec<f64>>,
    pub model_transformation: Option<Vec<f64>>,
    pub key_directory: Option<Vec<u16>>,
    pub double_params: Option<Vec<f64>>,
    /// Raw bytes, trailing NULs removed
    pub ascii_params: Option<Vec<u8>>,
    /// GDAL nodata marker, raw bytes
    pub nodata: Option<Vec<u8>>,
    /// GDAL metadata XML, raw bytes
    pub gdal_metadata: Option<Vec<u8>>,
    pub rpc_coefficients: Option<Vec<f64>>,
}

impl GeoMetadataBlock {
    /// Reads every present block from the main IFD
    ///
    /// GDAL tags are read only when the registry knows them and the entry
    /// matches the registered field type.
    pub fn read(
        reader: &TiffReader,
        source: &mut dyn SeekableReader,
        ifd: &IFD,
        registry: &TagRegistry,
    ) -> TiffResult<Self> {
        let mut block = GeoMetadataBlock {
            pixel_scale: Self::doubles(reader, source, ifd, tags::MODEL_PIXEL_SCALE_TAG)?,
            tie_points: Self::doubles(reader, source, ifd, tags::MODEL_TIEPOINT_TAG)?,
            model_transformation: Self::doubles(reader, source, ifd, tags::MODEL_TRANSFORMATION_TAG)?,
            double_params: Self::doubles(reader, source, ifd, tags::GEO_DOUBLE_PARAMS_TAG)?,
            ..Default::default()
        };

        if ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            block.key_directory = Some(reader.read_tag_shorts(source, ifd, tags::GEO_KEY_DIRECTORY_TAG)?);
        }
        if ifd.has_tag(tags::GEO_ASCII_PARAMS_TAG) {
            block.ascii_params = Some(reader.read_tag_ascii_bytes(source, ifd, tags::GEO_ASCII_PARAMS_TAG)?);
        }

        if Self::custom_tag_usable(ifd, registry, tags::GDAL_NODATA) {
            block.nodata = Some(reader.read_tag_ascii_bytes(source, ifd, tags::GDAL_NODATA)?);
        }
        if Self::custom_tag_usable(ifd, registry, tags::GDAL_METADATA) {
            block.gdal_metadata = Some(reader.read_tag_ascii_bytes(source, ifd, tags::GDAL_METADATA)?);
        }
        if Self::custom_tag_usable(ifd, registry, tags::RPC_COEFFICIENT) {
            block.rpc_coefficients = Some(reader.read_tag_doubles(source, ifd, tags::RPC_COEFFICIENT)?);
        }

        debug!("Geo metadata: {} blocks present", block.present_count());
        Ok(block)
    }

    fn doubles(reader: &TiffReader, source: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Option<Vec<f64>>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        reader.read_tag_doubles(source, ifd, tag).map(Some)
    }

    fn custom_tag_usable(ifd: &IFD, registry: &TagRegistry, tag: u16) -> bool {
        let Some(entry) = ifd.get_entry(tag) else {
            return false;
        };
        if !registry.is_registered(tag) {
            warn!("Skipping unregistered tag {}; register the GDAL tags before reading", tag);
            return false;
        }
        registry.validate_entry(entry)
    }

    /// Whether the source carries no georeferencing at all
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    /// Number of blocks present
    pub fn present_count(&self) -> usize {
        [
            self.pixel_scale.is_some(),
            self.tie_points.is_some(),
            self.model_transformation.is_some(),
            self.key_directory.is_some(),
            self.double_params.is_some(),
            self.ascii_params.is_some(),
            self.nodata.is_some(),
            self.gdal_metadata.is_some(),
            self.rpc_coefficients.is_some(),
        ].iter().filter(|&&present| present).count()
    }
}

impl fmt::Display for GeoMetadataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Geo metadata:")?;
        if self.is_empty() {
            return writeln!(f, "  (none)");
        }
        if let Some(v) = &self.pixel_scale {
            writeln!(f, "  ModelPixelScale: {:?}", v)?;
        }
        if let Some(v) = &self.tie_points {
            writeln!(f, "  ModelTiepoint: {:?}", v)?;
        }
        if let Some(v) = &self.model_transformation {
            writeln!(f, "  ModelTransformation: {:?}", v)?;
        }
        if let Some(v) = &self.key_directory {
            writeln!(f, "  GeoKeyDirectory: {} values ({} keys)", v.len(), v.get(3).copied().unwrap_or(0))?;
        }
        if let Some(v) = &self.double_params {
            writeln!(f, "  GeoDoubleParams: {:?}", v)?;
        }
        if let Some(v) = &self.ascii_params {
            writeln!(f, "  GeoAsciiParams: {:?}", String::from_utf8_lossy(v))?;
        }
        if let Some(v) = &self.nodata {
            writeln!(f, "  GDALNoData: {:?}", String::from_utf8_lossy(v))?;
        }
        if let Some(v) = &self.gdal_metadata {
            writeln!(f, "  GDALMetadata: {} bytes", v.len())?;
        }
        if let Some(v) = &self.rpc_coefficients {
            writeln!(f, "  RPCCoefficient: {} values", v.len())?;
        }
        Ok(())
    }
}
