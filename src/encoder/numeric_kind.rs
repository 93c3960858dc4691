//! Closed set of sample kinds the encoder understands

use std::fmt;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

/// Numeric interpretation of one source sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

/// One decoded source sample, tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl NumericKind {
    /// Resolves the kind from the SampleFormat and BitsPerSample tags
    ///
    /// Void, complex and odd widths are rejected here, before any strip is
    /// read, so the per-sample path never meets an unknown combination.
    pub fn resolve(format: u16, bits_per_sample: u16) -> TiffResult<Self> {
        let kind = match (format, bits_per_sample) {
            (sample_format::UNSIGNED, 8) => NumericKind::U8,
            (sample_format::UNSIGNED, 16) => NumericKind::U16,
            (sample_format::UNSIGNED, 32) => NumericKind::U32,
            (sample_format::SIGNED, 8) => NumericKind::I8,
            (sample_format::SIGNED, 16) => NumericKind::I16,
            (sample_format::SIGNED, 32) => NumericKind::I32,
            (sample_format::IEEEFP, 32) => NumericKind::F32,
            (sample_format::IEEEFP, 64) => NumericKind::F64,
            _ => return Err(TiffError::UnsupportedSampleFormat {
                sample_format: format,
                bits_per_sample,
            }),
        };
        Ok(kind)
    }

    /// Storage width of one sample in bytes
    pub fn bytes(&self) -> usize {
        match self {
            NumericKind::U8 | NumericKind::I8 => 1,
            NumericKind::U16 | NumericKind::I16 => 2,
            NumericKind::U32 | NumericKind::I32 | NumericKind::F32 => 4,
            NumericKind::F64 => 8,
        }
    }

    pub fn bits(&self) -> u16 {
        self.bytes() as u16 * 8
    }

    pub fn is_float(&self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }

    /// Reinterprets the first `bytes()` bytes of `raw` in the file byte order
    pub fn read_sample(&self, raw: &[u8], handler: &dyn ByteOrderHandler) -> Sample {
        match self {
            NumericKind::U8 => Sample::U8(raw[0]),
            NumericKind::U16 => Sample::U16(handler.u16_from(raw)),
            NumericKind::U32 => Sample::U32(handler.u32_from(raw)),
            NumericKind::I8 => Sample::I8(raw[0] as i8),
            NumericKind::I16 => Sample::I16(handler.u16_from(raw) as i16),
            NumericKind::I32 => Sample::I32(handler.u32_from(raw) as i32),
            NumericKind::F32 => Sample::F32(handler.f32_from(raw)),
            NumericKind::F64 => Sample::F64(handler.f64_from(raw)),
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericKind::U8 => "8-bit unsigned",
            NumericKind::U16 => "16-bit unsigned",
            NumericKind::U32 => "32-bit unsigned",
            NumericKind::I8 => "8-bit signed",
            NumericKind::I16 => "16-bit signed",
            NumericKind::I32 => "32-bit signed",
            NumericKind::F32 => "32-bit float",
            NumericKind::F64 => "64-bit float",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::byte_order::{BigEndianHandler, LittleEndianHandler};

    #[test]
    fn test_resolve_supported_kinds() {
        assert_eq!(NumericKind::resolve(1, 32).unwrap(), NumericKind::U32);
        assert_eq!(NumericKind::resolve(2, 16).unwrap(), NumericKind::I16);
        assert_eq!(NumericKind::resolve(3, 64).unwrap(), NumericKind::F64);
        assert_eq!(NumericKind::resolve(3, 32).unwrap().bytes(), 4);
    }

    #[test]
    fn test_resolve_rejects_void_complex_and_odd_widths() {
        for (format, bits) in [(4, 32), (5, 32), (6, 64), (1, 12), (3, 16), (1, 64)] {
            let err = NumericKind::resolve(format, bits).unwrap_err();
            assert!(matches!(err, TiffError::UnsupportedSampleFormat { sample_format, bits_per_sample }
                if sample_format == format && bits_per_sample == bits));
        }
    }

    #[test]
    fn test_read_sample_byte_order() {
        let le = NumericKind::I16.read_sample(&[0xFE, 0xFF], &LittleEndianHandler);
        assert_eq!(le, Sample::I16(-2));

        let be = NumericKind::F32.read_sample(&1.5f32.to_be_bytes(), &BigEndianHandler);
        assert_eq!(be, Sample::F32(1.5));
    }
}
