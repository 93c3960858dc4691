//! Reversal of TIFF predictors
//!
//! Predictor 2 stores each sample as the difference from its left neighbour.
//! Predictor 3 splits each row of floats into byte planes (most significant
//! first) and differences those bytes.

use crate::encoder::NumericKind;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};

/// Rejects predictor and sample kind pairs that cannot be reversed
pub fn check_predictor(code: u16, kind: NumericKind) -> TiffResult<()> {
    let supported = match code {
        predictor::NONE | predictor::HORIZONTAL_DIFFERENCING => true,
        predictor::FLOATING_POINT => kind.is_float(),
        _ => false,
    };

    if supported {
        Ok(())
    } else {
        Err(TiffError::UnsupportedPredictor { predictor: code, bits_per_sample: kind.bits() })
    }
}

/// Undoes the predictor in place
///
/// # Arguments
/// * `data` - Decompressed segment, whole rows of `row_samples` samples
/// * `code` - Predictor tag value
/// * `row_samples` - Samples per row of the segment
/// * `bytes_per_sample` - Width of one sample
/// * `byte_order` - Byte order of the source file
pub fn undo_predictor(
    data: &mut [u8],
    code: u16,
    row_samples: usize,
    bytes_per_sample: usize,
    byte_order: ByteOrder,
) -> TiffResult<()> {
    let row_bytes = row_samples * bytes_per_sample;
    if row_bytes == 0 {
        return Ok(());
    }

    match code {
        predictor::NONE => Ok(()),
        predictor::HORIZONTAL_DIFFERENCING => {
            for row in data.chunks_exact_mut(row_bytes) {
                accumulate_samples(row, bytes_per_sample, byte_order);
            }
            Ok(())
        }
        predictor::FLOATING_POINT => {
            let mut planes = vec![0u8; row_bytes];
            for row in data.chunks_exact_mut(row_bytes) {
                undo_floating_point_row(row, &mut planes, row_samples, bytes_per_sample, byte_order);
            }
            Ok(())
        }
        _ => Err(TiffError::UnsupportedPredictor {
            predictor: code,
            bits_per_sample: (bytes_per_sample * 8) as u16,
        }),
    }
}

/// Cumulative sum over a row, as integers of the sample width
fn accumulate_samples(row: &mut [u8], width: usize, byte_order: ByteOrder) {
    if width == 1 {
        for i in 1..row.len() {
            row[i] = row[i].wrapping_add(row[i - 1]);
        }
        return;
    }

    let mask = if width >= 8 { u64::MAX } else { (1u64 << (width * 8)) - 1 };
    let mut prev = read_uint(&row[..width], byte_order);
    for sample in row.chunks_exact_mut(width).skip(1) {
        let value = read_uint(sample, byte_order).wrapping_add(prev) & mask;
        write_uint(sample, value, byte_order);
        prev = value;
    }
}

fn undo_floating_point_row(
    row: &mut [u8],
    planes: &mut [u8],
    row_samples: usize,
    width: usize,
    byte_order: ByteOrder,
) {
    planes.copy_from_slice(row);
    for i in 1..planes.len() {
        planes[i] = planes[i].wrapping_add(planes[i - 1]);
    }

    for sample in 0..row_samples {
        for significance in 0..width {
            let position = match byte_order {
                ByteOrder::BigEndian => significance,
                ByteOrder::LittleEndian => width - 1 - significance,
            };
            row[sample * width + position] = planes[significance * row_samples + sample];
        }
    }
}

fn read_uint(bytes: &[u8], byte_order: ByteOrder) -> u64 {
    match byte_order {
        ByteOrder::LittleEndian => bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | b as u64),
        ByteOrder::BigEndian => bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u64),
    }
}

fn write_uint(bytes: &mut [u8], value: u64, byte_order: ByteOrder) {
    let width = bytes.len();
    for (i, byte) in bytes.iter_mut().enumerate() {
        let shift = match byte_order {
            ByteOrder::LittleEndian => i * 8,
            ByteOrder::BigEndian => (width - 1 - i) * 8,
        };
        *byte = (value >> shift) as u8;
    }
}
