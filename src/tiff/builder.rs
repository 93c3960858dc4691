//! TIFF file construction utilities
//!
//! This module collects the tags of the destination image and hands them,
//! together with the encoded frame, to the streaming writer. All values are
//! stored little-endian, the byte order of every file this crate writes.

use std::collections::HashMap;
use std::io::{Seek, Write};
use log::{debug, info};

use crate::compression::CompressionHandler;
use crate::decoder::OutputFrame;
use crate::tiff::constants::field_types;
use crate::tiff::errors::TiffResult;
use crate::tiff::geo_metadata::GeoMetadataBlock;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::tag_registry::TagRegistry;
use crate::utils::progress::ProgressTracker;
use crate::utils::string_utils;
use crate::utils::tag_utils;

use crate::tiff::builders::basic_tags::BasicTagsBuilder;
use crate::tiff::builders::geo_tags::GeoTagsBuilder;
use crate::tiff::builders::metadata_tags::MetadataBuilder;
use crate::tiff::builders::writer::{WriteSummary, WriterBuilder};

/// Builder for the destination TIFF
pub struct TiffBuilder {
    ifd: IFD,
    /// Encoded values of every entry, keyed by tag
    tag_data: HashMap<u16, Vec<u8>>,
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffBuilder {
    /// Create a new TIFF builder
    pub fn new() -> Self {
        debug!("Creating new TiffBuilder");
        TiffBuilder {
            ifd: IFD::new(0, 0),
            tag_data: HashMap::new(),
        }
    }

    /// The IFD as configured so far (strip tags are added at write time)
    pub fn ifd(&self) -> &IFD {
        &self.ifd
    }

    /// Encoded value bytes of a tag
    pub fn tag_data(&self, tag: u16) -> Option<&[u8]> {
        self.tag_data.get(&tag).map(Vec::as_slice)
    }

    /// Adds an entry with pre-encoded little-endian values
    pub fn add_raw(&mut self, tag: u16, field_type: u16, count: u64, data: Vec<u8>) {
        let mut first = [0u8; 8];
        let n = data.len().min(8);
        first[..n].copy_from_slice(&data[..n]);
        let first_value = match tag_utils::get_field_type_size(field_type) {
            2 => u16::from_le_bytes([first[0], first[1]]) as u64,
            4 => u32::from_le_bytes([first[0], first[1], first[2], first[3]]) as u64,
            8 => u64::from_le_bytes(first),
            _ => first[0] as u64,
        };

        self.ifd.add_entry(IFDEntry::new(tag, field_type, count, first_value));
        self.tag_data.insert(tag, data);
    }

    pub fn add_short(&mut self, tag: u16, value: u16) {
        self.add_shorts(tag, &[value]);
    }

    pub fn add_shorts(&mut self, tag: u16, values: &[u16]) {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.add_raw(tag, field_types::SHORT, values.len() as u64, data);
    }

    pub fn add_long(&mut self, tag: u16, value: u32) {
        self.add_raw(tag, field_types::LONG, 1, value.to_le_bytes().to_vec());
    }

    pub fn add_doubles(&mut self, tag: u16, values: &[f64]) {
        let data = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.add_raw(tag, field_types::DOUBLE, values.len() as u64, data);
    }

    /// Adds an ASCII entry, NUL-terminated
    pub fn add_ascii(&mut self, tag: u16, value: &str) {
        self.add_ascii_bytes(tag, value.as_bytes());
    }

    /// Adds an ASCII entry from raw bytes, NUL-terminated, without re-encoding
    pub fn add_ascii_bytes(&mut self, tag: u16, value: &[u8]) {
        let data = string_utils::to_tiff_ascii(value);
        self.add_raw(tag, field_types::ASCII, data.len() as u64, data);
    }

    /// Add the fixed RGB layout tags of an encoded heightmap
    pub fn add_rgb_output_tags(&mut self, width: u32, height: u32, compression: u16) {
        BasicTagsBuilder::add_rgb_output_tags(self, width, height, compression);
    }

    /// Copy the georeferencing blocks of the source
    pub fn add_geo_tags(&mut self, geo: &GeoMetadataBlock) {
        GeoTagsBuilder::add_geo_tags(self, geo);
    }

    /// Copy the GDAL nodata, metadata and RPC tags of the source
    pub fn add_gdal_tags(&mut self, geo: &GeoMetadataBlock, registry: &TagRegistry) {
        MetadataBuilder::add_gdal_tags(self, geo, registry);
    }

    /// Stream the frame and the tags to `writer`
    pub fn write<W: Write + Seek>(
        &self,
        writer: &mut W,
        frame: &OutputFrame,
        codec: &dyn CompressionHandler,
        progress: &ProgressTracker,
    ) -> TiffResult<WriteSummary> {
        info!("Writing {}x{} RGB frame with {} tags ({})",
              frame.width(), frame.height(), self.ifd.entries.len(), codec.name());
        WriterBuilder::write(writer, &self.ifd, &self.tag_data, frame, codec, progress)
    }
}
