//! GeoTIFF tag strategies
//!
//! Copies the georeferencing blocks read from the source onto the
//! destination. The frame keeps the source geometry, so values are written
//! unchanged.

use crate::tiff::TiffBuilder;
use crate::tiff::constants::tags;
use crate::tiff::geo_metadata::GeoMetadataBlock;
use log::{debug, info};

/// Handles GeoTIFF tags
pub struct GeoTagsBuilder;

impl GeoTagsBuilder {
    /// Add every present GeoTIFF block; absent blocks are omitted
    pub fn add_geo_tags(builder: &mut TiffBuilder, geo: &GeoMetadataBlock) {
        info!("Copying GeoTIFF tags");

        if let Some(values) = &geo.pixel_scale {
            debug!("ModelPixelScale: {} values", values.len());
            builder.add_doubles(tags::MODEL_PIXEL_SCALE_TAG, values);
        }
        if let Some(values) = &geo.tie_points {
            debug!("ModelTiepoint: {} values", values.len());
            builder.add_doubles(tags::MODEL_TIEPOINT_TAG, values);
        }
        if let Some(values) = &geo.model_transformation {
            builder.add_doubles(tags::MODEL_TRANSFORMATION_TAG, values);
        }
        if let Some(values) = &geo.key_directory {
            debug!("GeoKeyDirectory: {} keys", values.get(3).copied().unwrap_or(0));
            builder.add_shorts(tags::GEO_KEY_DIRECTORY_TAG, values);
        }
        // Key directory entries may point into these two
        if let Some(values) = &geo.double_params {
            builder.add_doubles(tags::GEO_DOUBLE_PARAMS_TAG, values);
        }
        if let Some(text) = &geo.ascii_params {
            builder.add_ascii_bytes(tags::GEO_ASCII_PARAMS_TAG, text);
        }
    }
}
