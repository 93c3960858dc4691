//! Scalar to 24-bit RGB encoding

use std::fmt;
use std::str::FromStr;

use crate::tiff::errors::{TiffError, TiffResult};
use super::numeric_kind::Sample;

/// Largest value representable across three 8-bit channels
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Bias added to signed samples under [`SignedPolicy::Offset`]
pub const SIGNED_OFFSET_BIAS: i64 = 1 << 23;

/// Fixed-point multiplier applied to float samples unless configured
pub const DEFAULT_MULTIPLIER: f64 = 100.0;

/// How 8 and 16-bit unsigned samples are placed in the 24-bit domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrowPolicy {
    /// Value unchanged
    #[default]
    Identity,
    /// Shift into the high bits: `v << (24 - bits)`
    Shift,
    /// Linear map of the full source range onto the full 24-bit range
    Rescale,
}

/// How signed integer samples are mapped to unsigned 24-bit values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignedPolicy {
    /// Negatives become 0, large values saturate
    #[default]
    Clamp,
    /// Add 2^23, then clamp; decoders subtract 2^23
    Offset,
}

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingConfig {
    pub multiplier: f64,
    pub narrow_policy: NarrowPolicy,
    pub signed_policy: SignedPolicy,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        EncodingConfig {
            multiplier: DEFAULT_MULTIPLIER,
            narrow_policy: NarrowPolicy::default(),
            signed_policy: SignedPolicy::default(),
        }
    }
}

impl EncodingConfig {
    /// Checks that the multiplier is finite and positive
    pub fn validate(&self) -> TiffResult<()> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(TiffError::Config(format!(
                "multiplier must be finite and greater than zero, got {}", self.multiplier)));
        }
        Ok(())
    }
}

/// Encoder bound to a validated configuration
#[derive(Debug, Clone, Copy)]
pub struct HeightEncoder {
    config: EncodingConfig,
}

impl HeightEncoder {
    pub fn new(config: EncodingConfig) -> TiffResult<Self> {
        config.validate()?;
        Ok(HeightEncoder { config })
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Maps a sample to its 24-bit value
    pub fn to_u24(&self, sample: Sample) -> u32 {
        match sample {
            Sample::U8(v) => self.narrow(v as u32, 8),
            Sample::U16(v) => self.narrow(v as u32, 16),
            Sample::U32(v) => v & U24_MAX,
            Sample::I8(v) => self.signed(v as i64),
            Sample::I16(v) => self.signed(v as i64),
            Sample::I32(v) => self.signed(v as i64),
            Sample::F32(v) => self.float(v as f64),
            Sample::F64(v) => self.float(v),
        }
    }

    /// Encodes a sample as three big-endian bytes
    pub fn encode(&self, sample: Sample) -> [u8; 3] {
        pack_u24(self.to_u24(sample))
    }

    fn narrow(&self, value: u32, bits: u32) -> u32 {
        match self.config.narrow_policy {
            NarrowPolicy::Identity => value,
            NarrowPolicy::Shift => value << (24 - bits),
            NarrowPolicy::Rescale => {
                let source_max = (1u64 << bits) - 1;
                (value as u64 * U24_MAX as u64 / source_max) as u32
            }
        }
    }

    fn signed(&self, value: i64) -> u32 {
        let biased = match self.config.signed_policy {
            SignedPolicy::Clamp => value,
            SignedPolicy::Offset => value + SIGNED_OFFSET_BIAS,
        };
        biased.clamp(0, U24_MAX as i64) as u32
    }

    fn float(&self, value: f64) -> u32 {
        let scaled = (value * self.config.multiplier).trunc();
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(0.0, U24_MAX as f64) as u32
    }
}

/// Encodes one sample under `config`
///
/// Fails only when the configuration itself is invalid.
pub fn encode(sample: Sample, config: &EncodingConfig) -> TiffResult<[u8; 3]> {
    Ok(HeightEncoder::new(*config)?.encode(sample))
}

/// Splits the low 24 bits of `value` into [23:16], [15:8], [7:0]
pub fn pack_u24(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Reassembles a value packed by [`pack_u24`]
pub fn unpack_u24(bytes: [u8; 3]) -> u32 {
    ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32
}

impl FromStr for NarrowPolicy {
    type Err = TiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(NarrowPolicy::Identity),
            "shift" => Ok(NarrowPolicy::Shift),
            "rescale" => Ok(NarrowPolicy::Rescale),
            other => Err(TiffError::Config(format!(
                "unknown narrow policy '{}' (expected identity, shift or rescale)", other))),
        }
    }
}

impl FromStr for SignedPolicy {
    type Err = TiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(SignedPolicy::Clamp),
            "offset" => Ok(SignedPolicy::Offset),
            other => Err(TiffError::Config(format!(
                "unknown signed policy '{}' (expected clamp or offset)", other))),
        }
    }
}

impl fmt::Display for NarrowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NarrowPolicy::Identity => "identity",
            NarrowPolicy::Shift => "shift",
            NarrowPolicy::Rescale => "rescale",
        })
    }
}

impl fmt::Display for SignedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignedPolicy::Clamp => "clamp",
            SignedPolicy::Offset => "offset",
        })
    }
}
