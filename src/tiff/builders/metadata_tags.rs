//! GDAL metadata tag strategies
//!
//! NoData, the GDAL metadata document and RPC coefficients are copied
//! verbatim, typed by their registered schema.

use crate::tiff::TiffBuilder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::geo_metadata::GeoMetadataBlock;
use crate::tiff::tag_registry::TagRegistry;
use log::{debug, warn};

/// Handles GDAL-specific metadata tags
pub struct MetadataBuilder;

impl MetadataBuilder {
    /// Add the GDAL tags present on the source
    ///
    /// A tag is only written when the registry carries its schema.
    pub fn add_gdal_tags(builder: &mut TiffBuilder, geo: &GeoMetadataBlock, registry: &TagRegistry) {
        if let Some(nodata) = &geo.nodata {
            if Self::registered(registry, tags::GDAL_NODATA, field_types::ASCII) {
                debug!("Adding GDAL NoData tag: {}", String::from_utf8_lossy(nodata));
                builder.add_ascii_bytes(tags::GDAL_NODATA, nodata);
            }
        }

        if let Some(metadata) = &geo.gdal_metadata {
            if Self::registered(registry, tags::GDAL_METADATA, field_types::ASCII) {
                debug!("Adding GDAL metadata tag: {} bytes", metadata.len());
                builder.add_ascii_bytes(tags::GDAL_METADATA, metadata);
            }
        }

        if let Some(rpc) = &geo.rpc_coefficients {
            if Self::registered(registry, tags::RPC_COEFFICIENT, field_types::DOUBLE) {
                debug!("Adding RPC coefficients: {} values", rpc.len());
                builder.add_doubles(tags::RPC_COEFFICIENT, rpc);
            }
        }
    }

    fn registered(registry: &TagRegistry, tag: u16, field_type: u16) -> bool {
        match registry.schema(tag) {
            Some(schema) if schema.field_type == field_type => true,
            _ => {
                warn!("Tag {} ({}) is not registered as {}, not written",
                      tag, registry.name(tag), crate::utils::tag_utils::get_field_type_name(field_type));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodata_is_nul_terminated_ascii() {
        let geo = GeoMetadataBlock {
            nodata: Some(b"-9999".to_vec()),
            rpc_coefficients: Some(vec![1.0; 92]),
            ..Default::default()
        };

        let mut builder = TiffBuilder::new();
        MetadataBuilder::add_gdal_tags(&mut builder, &geo, &TagRegistry::with_gdal_tags());

        let entry = builder.ifd().get_entry(tags::GDAL_NODATA).unwrap();
        assert_eq!((entry.field_type, entry.count), (field_types::ASCII, 6));
        assert_eq!(builder.tag_data(tags::GDAL_NODATA), Some(&b"-9999\0"[..]));
        assert_eq!(builder.ifd().get_entry(tags::RPC_COEFFICIENT).unwrap().count, 92);
    }

    #[test]
    fn test_unregistered_tags_are_skipped() {
        let geo = GeoMetadataBlock { nodata: Some(b"0".to_vec()), ..Default::default() };

        let mut builder = TiffBuilder::new();
        MetadataBuilder::add_gdal_tags(&mut builder, &geo, &TagRegistry::new());
        assert!(!builder.ifd().has_tag(tags::GDAL_NODATA));
    }
}
