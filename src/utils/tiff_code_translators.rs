//! TIFF code translators
//!
//! This module provides utilities for translating numeric TIFF tag values
//! into human-readable descriptions, used in diagnostics and inspection output.

use crate::tiff::constants::{compression, orientation, sample_format, predictor, planar_config};

/// Converts a TIFF compression code to its human-readable description
pub fn compression_code_to_name(compression_code: u64) -> &'static str {
    match compression_code {
        code if code == compression::NONE as u64 => "Uncompressed",
        code if code == compression::CCITT_RLE as u64 => "CCITT RLE",
        code if code == compression::CCITT_FAX3 as u64 => "CCITT Group 3 fax",
        code if code == compression::CCITT_FAX4 as u64 => "CCITT Group 4 fax",
        code if code == compression::LZW as u64 => "LZW",
        code if code == compression::JPEG_OLD as u64 => "JPEG (old-style)",
        code if code == compression::JPEG as u64 => "JPEG",
        code if code == compression::DEFLATE as u64 => "Adobe Deflate (zlib)",
        code if code == compression::DEFLATE_OLD as u64 => "Deflate (pre-standard code)",
        code if code == compression::ZSTD as u64 => "ZSTD",
        code if code == compression::PACKBITS as u64 => "PackBits",
        _ => "Unknown",
    }
}

/// Converts a TIFF sample format code to its human-readable description
pub fn sample_format_code_to_name(sample_format_code: u64) -> &'static str {
    match sample_format_code {
        code if code == sample_format::UNSIGNED as u64 => "Unsigned integer",
        code if code == sample_format::SIGNED as u64 => "Signed integer",
        code if code == sample_format::IEEEFP as u64 => "IEEE floating point",
        code if code == sample_format::VOID as u64 => "Undefined",
        code if code == sample_format::COMPLEX_INT as u64 => "Complex integer",
        code if code == sample_format::COMPLEX_IEEEFP as u64 => "Complex floating point",
        _ => "Unknown",
    }
}

/// Converts a TIFF predictor code to its human-readable description
pub fn predictor_code_to_name(predictor_code: u64) -> &'static str {
    match predictor_code {
        code if code == predictor::NONE as u64 => "No prediction scheme",
        code if code == predictor::HORIZONTAL_DIFFERENCING as u64 => "Horizontal differencing",
        code if code == predictor::FLOATING_POINT as u64 => "Floating point predictor",
        _ => "Unknown",
    }
}

/// Converts a TIFF planar configuration code to its human-readable description
pub fn planar_config_code_to_name(planar_config_code: u64) -> &'static str {
    match planar_config_code {
        code if code == planar_config::CHUNKY as u64 => "Chunky (interleaved)",
        code if code == planar_config::PLANAR as u64 => "Planar (separate)",
        _ => "Unknown",
    }
}

/// Converts a TIFF orientation code to its human-readable description
pub fn orientation_code_to_name(orientation_code: u64) -> &'static str {
    match orientation_code {
        code if code == orientation::TOP_LEFT as u64 => "Top-left",
        code if code == orientation::TOP_RIGHT as u64 => "Top-right",
        code if code == orientation::BOTTOM_RIGHT as u64 => "Bottom-right",
        code if code == orientation::BOTTOM_LEFT as u64 => "Bottom-left",
        code if code >= orientation::LEFT_TOP as u64 && code <= orientation::LEFT_BOTTOM as u64 => "Transposed",
        _ => "Unknown",
    }
}
