//! Compression handling for TIFF strips and tiles
//!
//! This module implements strategies for handling different compression methods.
//! Every codec decodes source segments; the lossless ones can also encode
//! destination strips.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;
mod packbits;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::{ZstdHandler, DEFAULT_ZSTD_LEVEL};
pub use packbits::PackBitsHandler;
