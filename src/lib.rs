pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod encoder;
pub mod decoder;
pub mod config;
pub mod converter;
pub mod commands;
pub mod api;

pub use crate::api::Hmapper;

pub use tiff::{TiffReader, TiffError, TiffResult, RasterDescriptor, GeoMetadataBlock, TagRegistry};
pub use config::Config;
pub use converter::{ConversionReport, HeightmapConverter};
pub use encoder::{EncodingConfig, HeightEncoder, NumericKind, Sample};
