//! Handler for PackBits run-length encoded data

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Longest literal or repeat run a single header byte can describe
const MAX_RUN: usize = 128;

/// PackBits compression handler (compression code 32773)
pub struct PackBitsHandler;

impl CompressionHandler for PackBitsHandler {
    fn decompress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        let mut pos = 0;

        while pos < data.len() {
            let header = data[pos] as i8;
            pos += 1;

            match header {
                0..=127 => {
                    let len = header as usize + 1;
                    let literal = data.get(pos..pos + len).ok_or_else(|| TiffError::GenericError(
                        format!("PackBits literal run of {} bytes truncated at offset {}", len, pos)))?;
                    out.extend_from_slice(literal);
                    pos += len;
                }
                -127..=-1 => {
                    let len = 1 - header as isize;
                    let value = *data.get(pos).ok_or_else(|| TiffError::GenericError(
                        format!("PackBits repeat run truncated at offset {}", pos)))?;
                    out.extend(std::iter::repeat(value).take(len as usize));
                    pos += 1;
                }
                // -128 is a no-op
                _ => {}
            }
        }

        Ok(out)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() + data.len() / MAX_RUN + 1);
        let mut pos = 0;

        while pos < data.len() {
            let run = data[pos..].iter()
                .take(MAX_RUN)
                .take_while(|&&b| b == data[pos])
                .count();

            if run >= 2 {
                out.push((1 - run as isize) as i8 as u8);
                out.push(data[pos]);
                pos += run;
                continue;
            }

            // Literal run up to the next repeat of at least two bytes
            let start = pos;
            while pos < data.len() && pos - start < MAX_RUN {
                if pos + 1 < data.len() && data[pos] == data[pos + 1] {
                    break;
                }
                pos += 1;
            }
            out.push((pos - start - 1) as u8);
            out.extend_from_slice(&data[start..pos]);
        }

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "PackBits"
    }

    fn code(&self) -> u16 {
        compression::PACKBITS
    }
}
