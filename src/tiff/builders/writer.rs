//! TIFF writing strategies
//!
//! Streams the destination file in one forward pass: a header with a
//! placeholder IFD offset, every strip, the out-of-line tag values, then the
//! IFD itself. The header is patched last. Output is always little-endian;
//! BigTIFF is selected when the file could exceed the classic 4 GiB limit.

use crate::compression::CompressionHandler;
use crate::decoder::OutputFrame;
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::constants::{field_types, header, tags};
use crate::utils::ifd_utils;
use crate::utils::progress::ProgressTracker;
use crate::utils::write_utils;
use log::{debug, info};
use std::collections::HashMap;
use std::io::{self, Seek, SeekFrom, Write};

/// Largest offset a classic TIFF can address
const CLASSIC_LIMIT: u64 = u32::MAX as u64;

/// What the writer produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub strips: usize,
    pub bytes: u64,
    pub big_tiff: bool,
}

/// Handles writing TIFF files
pub struct WriterBuilder;

impl WriterBuilder {
    /// Write the complete destination TIFF
    ///
    /// A failure while writing strip `n` aborts the remaining strips and is
    /// reported as `StripWrite { strip: n }`. Each strip is flushed before the
    /// next one starts, so a buffered `writer` reports against the right strip.
    pub fn write<W: Write + Seek>(
        writer: &mut W,
        ifd: &IFD,
        tag_data: &HashMap<u16, Vec<u8>>,
        frame: &OutputFrame,
        codec: &dyn CompressionHandler,
        progress: &ProgressTracker,
    ) -> TiffResult<WriteSummary> {
        let tag_bytes: u64 = tag_data.values().map(|d| d.len() as u64).sum();
        let big_tiff = Self::needs_big_tiff(frame.as_bytes().len() as u64, tag_bytes, frame.height() as u64);
        info!("Writing {} ({} strips)", if big_tiff { "BigTIFF" } else { "classic TIFF" }, frame.height());

        let mut position = Self::write_header(writer, big_tiff)?;

        // Strips, one image row each
        let strip_count = frame.height() as usize;
        let mut strip_offsets = Vec::with_capacity(strip_count);
        let mut strip_byte_counts = Vec::with_capacity(strip_count);

        for strip in 0..strip_count {
            let encoded = codec.compress(frame.row(strip as u32))
                .map_err(|e| TiffError::StripWrite { strip, source: io::Error::other(e.to_string()) })?;
            writer.write_all(&encoded)
                .and_then(|()| writer.flush())
                .map_err(|source| TiffError::StripWrite { strip, source })?;

            strip_offsets.push(position);
            strip_byte_counts.push(encoded.len() as u64);
            position += encoded.len() as u64;
            progress.increment(1);
        }

        if !big_tiff && position > CLASSIC_LIMIT {
            return Err(TiffError::GenericError(format!(
                "strip data ends at {} bytes, beyond the classic TIFF limit", position)));
        }

        let (entries, values) = Self::final_entries(ifd, tag_data, &strip_offsets, &strip_byte_counts, big_tiff);

        // Values that do not fit in the entry go before the IFD
        let inline_size = if big_tiff { 8 } else { 4 };
        let mut value_offsets = HashMap::new();
        for entry in &entries {
            let data = Self::entry_data(&values, entry.tag)?;
            if data.len() > inline_size {
                position = write_utils::write_padding(writer, position)?;
                value_offsets.insert(entry.tag, position);
                writer.write_all(data)?;
                position += data.len() as u64;
            }
        }

        let ifd_offset = write_utils::write_padding(writer, position)?;
        let ifd_end = ifd_offset + ifd_utils::calculate_ifd_size(entries.len(), big_tiff);
        if !big_tiff && ifd_end > CLASSIC_LIMIT {
            return Err(TiffError::GenericError(format!(
                "IFD ends at {} bytes, beyond the classic TIFF limit", ifd_end)));
        }

        Self::write_ifd(writer, &entries, &values, &value_offsets, big_tiff)?;
        Self::write_first_ifd_offset(writer, ifd_offset, big_tiff)?;
        writer.flush()?;

        debug!("IFD at offset {}, file size {}", ifd_offset, ifd_end);
        Ok(WriteSummary { strips: strip_count, bytes: ifd_end, big_tiff })
    }

    /// Whether the file could outgrow 32-bit offsets
    ///
    /// Uses the uncompressed frame size plus a margin for codec expansion,
    /// so a compressed file may be BigTIFF even if it ends up smaller.
    pub fn needs_big_tiff(frame_bytes: u64, tag_bytes: u64, strip_count: u64) -> bool {
        let strip_arrays = strip_count * 2 * 4;
        let codec_margin = frame_bytes / 64 + strip_count * 16;
        let estimate = header::CLASSIC_HEADER_SIZE + frame_bytes + codec_margin + tag_bytes + strip_arrays + 4096;
        estimate > CLASSIC_LIMIT
    }

    /// Adds the strip tags and sorts the entries
    fn final_entries(
        ifd: &IFD,
        tag_data: &HashMap<u16, Vec<u8>>,
        strip_offsets: &[u64],
        strip_byte_counts: &[u64],
        big_tiff: bool,
    ) -> (Vec<IFDEntry>, HashMap<u16, Vec<u8>>) {
        let mut entries = ifd.entries.clone();
        let mut values = tag_data.clone();

        for (tag, list) in [(tags::STRIP_OFFSETS, strip_offsets), (tags::STRIP_BYTE_COUNTS, strip_byte_counts)] {
            let (field_type, data): (u16, Vec<u8>) = if big_tiff {
                (field_types::LONG8, list.iter().flat_map(|v| v.to_le_bytes()).collect())
            } else {
                (field_types::LONG, list.iter().flat_map(|&v| (v as u32).to_le_bytes()).collect())
            };
            entries.push(IFDEntry::new(tag, field_type, list.len() as u64, list.first().copied().unwrap_or(0)));
            values.insert(tag, data);
        }

        (write_utils::get_unique_sorted_entries(&entries), values)
    }

    fn entry_data(values: &HashMap<u16, Vec<u8>>, tag: u16) -> TiffResult<&[u8]> {
        values.get(&tag)
            .map(Vec::as_slice)
            .ok_or_else(|| TiffError::GenericError(format!("No value bytes for tag {}", tag)))
    }

    /// Write the header with a zero first-IFD offset, returning its length
    fn write_header(writer: &mut impl Write, big_tiff: bool) -> TiffResult<u64> {
        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;

        if big_tiff {
            writer.write_all(&header::BIG_TIFF_VERSION.to_le_bytes())?;
            writer.write_all(&header::BIGTIFF_OFFSET_SIZE.to_le_bytes())?;
            writer.write_all(&[0u8, 0])?;  // Reserved
            writer.write_all(&[0u8; 8])?;  // First IFD offset placeholder
            Ok(header::BIG_HEADER_SIZE)
        } else {
            writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
            writer.write_all(&[0u8; 4])?;  // First IFD offset placeholder
            Ok(header::CLASSIC_HEADER_SIZE)
        }
    }

    /// Patch the header's first-IFD offset
    fn write_first_ifd_offset(writer: &mut (impl Write + Seek), offset: u64, big_tiff: bool) -> TiffResult<()> {
        let position = if big_tiff { 8 } else { 4 };
        writer.seek(SeekFrom::Start(position))?;

        match big_tiff {
            true => writer.write_all(&offset.to_le_bytes())?,
            false => writer.write_all(&(offset as u32).to_le_bytes())?,
        }

        writer.seek(SeekFrom::End(0))?;
        Ok(())
    }

    /// Write the IFD at the current position
    ///
    /// Values of at most 4 bytes (8 for BigTIFF) are packed into the entry,
    /// left-justified; larger values point at their offset.
    fn write_ifd(
        writer: &mut impl Write,
        entries: &[IFDEntry],
        values: &HashMap<u16, Vec<u8>>,
        value_offsets: &HashMap<u16, u64>,
        big_tiff: bool,
    ) -> TiffResult<()> {
        match big_tiff {
            true => writer.write_all(&(entries.len() as u64).to_le_bytes())?,
            false => writer.write_all(&(entries.len() as u16).to_le_bytes())?,
        }

        for entry in entries {
            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;

            match big_tiff {
                true => writer.write_all(&entry.count.to_le_bytes())?,
                false => writer.write_all(&(entry.count as u32).to_le_bytes())?,
            }

            let mut field = [0u8; 8];
            let field_len = if big_tiff { 8 } else { 4 };
            match value_offsets.get(&entry.tag) {
                Some(&offset) => field.copy_from_slice(&offset.to_le_bytes()),
                None => {
                    let data = Self::entry_data(values, entry.tag)?;
                    field[..data.len()].copy_from_slice(data);
                }
            }
            writer.write_all(&field[..field_len])?;
        }

        // No further IFDs
        match big_tiff {
            true => writer.write_all(&0u64.to_le_bytes())?,
            false => writer.write_all(&0u32.to_le_bytes())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::UncompressedHandler;
    use crate::tiff::builder::TiffBuilder;
    use crate::tiff::reader::TiffReader;
    use crate::utils::write_utils::FailAfter;
    use std::io::{BufWriter, Cursor};

    #[test]
    fn test_written_file_reads_back() {
        let mut frame = OutputFrame::allocate(3, 2, 1).unwrap();
        frame.put(0, 0, [1, 2, 3]);
        frame.put(2, 1, [7, 8, 9]);

        let mut builder = TiffBuilder::new();
        builder.add_rgb_output_tags(3, 2, 1);
        builder.add_doubles(tags::MODEL_PIXEL_SCALE_TAG, &[0.5, 0.5, 0.0]);

        let mut out = Cursor::new(Vec::new());
        let summary = builder.write(&mut out, &frame, &UncompressedHandler, &ProgressTracker::hidden(2)).unwrap();
        assert_eq!(summary.strips, 2);
        assert!(!summary.big_tiff);
        assert_eq!(summary.bytes, out.get_ref().len() as u64);

        let mut reader = TiffReader::new();
        let tiff = reader.read(&mut out).unwrap();
        let ifd = tiff.full_resolution().unwrap();
        assert_eq!(ifd.get_dimensions(), Some((3, 2)));

        let offsets = reader.read_tag_values(&mut out, ifd, tags::STRIP_OFFSETS).unwrap();
        let counts = reader.read_tag_values(&mut out, ifd, tags::STRIP_BYTE_COUNTS).unwrap();
        assert_eq!(counts, vec![9, 9]);
        let bytes = out.get_ref();
        assert_eq!(&bytes[offsets[0] as usize..offsets[0] as usize + 3], &[1, 2, 3]);
        assert_eq!(&bytes[offsets[1] as usize + 6..offsets[1] as usize + 9], &[7, 8, 9]);

        let scale = reader.read_tag_doubles(&mut out, ifd, tags::MODEL_PIXEL_SCALE_TAG).unwrap();
        assert_eq!(scale, vec![0.5, 0.5, 0.0]);
        assert_eq!(reader.read_tag_shorts(&mut out, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![8, 8, 8]);
    }

    #[test]
    fn test_big_tiff_threshold() {
        assert!(!WriterBuilder::needs_big_tiff(3 * 1024 * 1024, 1024, 1024));
        assert!(WriterBuilder::needs_big_tiff(CLASSIC_LIMIT, 0, 1));
        // Margin included, this still fits 32-bit offsets
        assert!(!WriterBuilder::needs_big_tiff(4_100_000_000, 0, 40_000));
        assert!(WriterBuilder::needs_big_tiff(4_250_000_000, 0, 40_000));
    }

    #[test]
    fn test_strip_write_failure_names_the_strip() {
        let frame = OutputFrame::allocate(4, 5, 1).unwrap();
        let mut builder = TiffBuilder::new();
        builder.add_rgb_output_tags(4, 5, 1);

        // Header plus two 12-byte rows fit, the third row does not
        let sink = FailAfter { inner: Cursor::new(Vec::new()), remaining: 8 + 2 * 12 };
        let mut writer = BufWriter::with_capacity(1024 * 1024, sink);
        let err = builder.write(&mut writer, &frame, &UncompressedHandler, &ProgressTracker::hidden(5)).unwrap_err();

        assert!(matches!(err, TiffError::StripWrite { strip: 2, .. }), "{:?}", err);
        assert_eq!(writer.get_ref().inner.get_ref().len(), 8 + 2 * 12);
    }
}
