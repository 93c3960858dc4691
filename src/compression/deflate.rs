//! Handler for Adobe Deflate compressed data

use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Adobe Deflate (Zlib) compression handler
///
/// Decodes both the standard code 8 and the pre-standard code 32946; always
/// writes code 8.
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed_data = Vec::new();
        decoder.read_to_end(&mut decompressed_data)
            .map_err(|e| TiffError::GenericError(format!("Deflate decompression error: {}", e)))?;
        Ok(decompressed_data)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).map_err(TiffError::IoError)?;
        encoder.finish().map_err(TiffError::IoError)
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u16 {
        compression::DEFLATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_restores_strip() {
        let strip: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let handler = AdobeDeflateHandler;
        let compressed = handler.compress(&strip).unwrap();
        assert_eq!(handler.decompress(&compressed).unwrap(), strip);
    }

    #[test]
    fn test_corrupt_deflate_is_error() {
        assert!(AdobeDeflateHandler.decompress(&[0xFF, 0x00, 0x12]).is_err());
    }
}
