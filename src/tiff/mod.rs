//! TIFF file format module
//!
//! This module provides structures and functions for reading TIFF and
//! BigTIFF source files and for writing the encoded destination.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
#[cfg(test)]
mod tests;
pub mod builder;
mod builders;
pub mod constants;
pub(crate) mod validation;
pub mod tag_registry;
pub mod descriptor;
pub mod geo_metadata;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{ErrorKind, TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use builder::TiffBuilder;
pub use builders::writer::WriteSummary;
pub use descriptor::{Layout, RasterDescriptor};
pub use geo_metadata::GeoMetadataBlock;
pub use tag_registry::{TagRegistry, TagSchema};
