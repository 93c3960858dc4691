//! Height encoding
//!
//! Maps one scalar elevation sample onto a 24-bit unsigned value and packs it
//! big-endian across the three channels of an RGB pixel.

mod numeric_kind;
mod height_encoder;

pub use numeric_kind::{NumericKind, Sample};
pub use height_encoder::{
    encode, pack_u24, unpack_u24, EncodingConfig, HeightEncoder, NarrowPolicy, SignedPolicy,
    DEFAULT_MULTIPLIER, SIGNED_OFFSET_BIAS, U24_MAX,
};
