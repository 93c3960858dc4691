//! TIFF tag utilities
//!
//! Utilities for working with TIFF tags and their values.

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::{field_types, tags, compression};

/// Determine how much space a particular TIFF field type needs in bytes
pub fn get_field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,  // Default to 1 byte
    }
}

/// Decodes raw tag bytes into integer values based on the field type
///
/// # Arguments
/// * `data` - Raw value bytes in file byte order
/// * `field_type` - The TIFF field type of the values
/// * `handler` - The byte order handler
///
/// # Returns
/// One u64 per value; rationals are packed as numerator << 32 | denominator
pub fn decode_integer_values(
    data: &[u8],
    field_type: u16,
    handler: &dyn ByteOrderHandler
) -> TiffResult<Vec<u64>> {
    let size = get_field_type_size(field_type);
    let mut values = Vec::with_capacity(data.len() / size);

    for chunk in data.chunks_exact(size) {
        let value = match field_type {
            field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => chunk[0] as u64,
            field_types::SHORT | field_types::SSHORT => handler.u16_from(chunk) as u64,
            field_types::LONG | field_types::SLONG => handler.u32_from(chunk) as u64,
            field_types::RATIONAL | field_types::SRATIONAL => {
                let num = handler.u32_from(&chunk[..4]);
                let den = handler.u32_from(&chunk[4..]);
                ((num as u64) << 32) | (den as u64)
            },
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => handler.u64_from(chunk),
            _ => return Err(TiffError::UnsupportedFieldType(field_type)),
        };

        values.push(value);
    }

    Ok(values)
}

/// Decodes raw tag bytes into floating point values
///
/// DOUBLE and FLOAT values are decoded directly, integer types are widened.
pub fn decode_float_values(
    data: &[u8],
    field_type: u16,
    handler: &dyn ByteOrderHandler
) -> TiffResult<Vec<f64>> {
    match field_type {
        field_types::DOUBLE => Ok(data.chunks_exact(8).map(|c| handler.f64_from(c)).collect()),
        field_types::FLOAT => Ok(data.chunks_exact(4).map(|c| handler.f32_from(c) as f64).collect()),
        _ => Ok(decode_integer_values(data, field_type, handler)?
            .into_iter()
            .map(|v| v as f64)
            .collect()),
    }
}

/// Get the name of a TIFF tag
///
/// Returns a human-readable name for a tag based on its numeric ID.
/// If the tag is not recognized, returns "Unknown".
pub fn get_tag_name(tag: u16) -> &'static str {
    match tag {
        // Basic image structure tags
        tags::NEW_SUBFILE_TYPE => "NewSubfileType",
        tags::IMAGE_WIDTH => "ImageWidth",
        tags::IMAGE_LENGTH => "ImageLength",
        tags::BITS_PER_SAMPLE => "BitsPerSample",
        tags::COMPRESSION => "Compression",
        tags::PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        tags::FILL_ORDER => "FillOrder",
        tags::STRIP_OFFSETS => "StripOffsets",
        tags::ORIENTATION => "Orientation",
        tags::SAMPLES_PER_PIXEL => "SamplesPerPixel",
        tags::ROWS_PER_STRIP => "RowsPerStrip",
        tags::STRIP_BYTE_COUNTS => "StripByteCounts",
        tags::PLANAR_CONFIGURATION => "PlanarConfiguration",
        tags::SOFTWARE => "Software",
        tags::PREDICTOR => "Predictor",
        tags::SAMPLE_FORMAT => "SampleFormat",

        // Tiling tags
        tags::TILE_WIDTH => "TileWidth",
        tags::TILE_LENGTH => "TileLength",
        tags::TILE_OFFSETS => "TileOffsets",
        tags::TILE_BYTE_COUNTS => "TileByteCounts",

        // GeoTIFF tags
        tags::MODEL_PIXEL_SCALE_TAG => "ModelPixelScale",
        tags::MODEL_TIEPOINT_TAG => "ModelTiepoint",
        tags::MODEL_TRANSFORMATION_TAG => "ModelTransformation",
        tags::GEO_KEY_DIRECTORY_TAG => "GeoKeyDirectory",
        tags::GEO_DOUBLE_PARAMS_TAG => "GeoDoubleParams",
        tags::GEO_ASCII_PARAMS_TAG => "GeoAsciiParams",

        // Default for unknown tags; custom tags are named by the TagRegistry
        _ => "Unknown",
    }
}

/// Get the name of a TIFF field type
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::LONG8 => "LONG8",
        field_types::SLONG8 => "SLONG8",
        field_types::IFD8 => "IFD8",
        _ => "Unknown",
    }
}

/// Get the name of a compression method
pub fn get_compression_name(compression_code: u64) -> &'static str {
    match compression_code as u16 {
        compression::NONE => "None",
        compression::CCITT_RLE => "CCITT RLE",
        compression::CCITT_FAX3 => "CCITT Group 3 Fax",
        compression::CCITT_FAX4 => "CCITT Group 4 Fax",
        compression::LZW => "LZW",
        compression::JPEG_OLD => "Old JPEG",
        compression::JPEG => "JPEG",
        compression::DEFLATE | compression::DEFLATE_OLD => "Adobe Deflate",
        compression::ZSTD => "Zstandard",
        compression::PACKBITS => "PackBits",
        _ => "Unknown",
    }
}
