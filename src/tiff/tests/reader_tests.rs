//! Tests for the reader and the raster descriptor

extern crate std;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::descriptor::{Layout, RasterDescriptor};
use crate::tiff::errors::{ErrorKind, TiffError};
use crate::tiff::reader::TiffReader;
use super::test_utils::{create_test_bigtiff_buffer, create_test_tiff_buffer, create_test_tiff_with_entries, InlineEntry};

fn single_band(order: ByteOrder, extra: &[InlineEntry]) -> std::io::Cursor<Vec<u8>> {
    let mut entries = vec![
        (tags::IMAGE_WIDTH, field_types::SHORT, 1, 4),
        (tags::IMAGE_LENGTH, field_types::SHORT, 1, 2),
        (tags::BITS_PER_SAMPLE, field_types::SHORT, 1, 16),
        (tags::STRIP_OFFSETS, field_types::LONG, 1, 200),
        (tags::STRIP_BYTE_COUNTS, field_types::LONG, 1, 16),
    ];
    entries.extend_from_slice(extra);
    entries.sort_by_key(|e| e.0);
    let mut cursor = create_test_tiff_with_entries(order, &entries);
    // Strip data region so offsets stay inside the file
    cursor.get_mut().resize(216, 0);
    cursor
}

#[test]
fn test_read_classic_and_bigtiff() {
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut create_test_tiff_buffer()).unwrap();
    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.full_resolution().unwrap().get_dimensions(), Some((800, 600)));

    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut create_test_bigtiff_buffer()).unwrap();
    std::assert!(tiff.is_big_tiff);
    std::assert_eq!(tiff.full_resolution().unwrap().get_dimensions(), Some((1024, 768)));
}

#[test]
fn test_big_endian_inline_shorts() {
    let mut source = single_band(ByteOrder::BigEndian, &[]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();
    let ifd = tiff.full_resolution().unwrap();

    std::assert_eq!(reader.byte_order(), Some(ByteOrder::BigEndian));
    std::assert_eq!(ifd.get_dimensions(), Some((4, 2)));
    std::assert_eq!(reader.read_tag_shorts(&mut source, ifd, tags::BITS_PER_SAMPLE).unwrap(), vec![16]);

    let descriptor = RasterDescriptor::read(&reader, &mut source, ifd).unwrap();
    std::assert_eq!(descriptor.bits_per_sample, 16);
    std::assert_eq!(descriptor.byte_order, ByteOrder::BigEndian);
    // RowsPerStrip absent: the whole image is one strip
    std::assert_eq!(descriptor.layout, Layout::Strips { rows_per_strip: 2 });
    std::assert_eq!(descriptor.segment_count(), 1);
}

#[test]
fn test_descriptor_rejects_multiband() {
    let mut source = single_band(ByteOrder::LittleEndian, &[(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, 3)]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();

    let err = RasterDescriptor::read(&reader, &mut source, tiff.full_resolution().unwrap()).unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::Precondition);
    std::assert!(std::matches!(&err, TiffError::Precondition { found, .. } if found.as_str() == "3"));
}

#[test]
fn test_descriptor_rejects_zero_rows_per_strip() {
    let mut source = single_band(ByteOrder::LittleEndian, &[(tags::ROWS_PER_STRIP, field_types::LONG, 1, 0)]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();

    let err = RasterDescriptor::read(&reader, &mut source, tiff.full_resolution().unwrap()).unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn test_descriptor_rejects_planar_and_transposed() {
    let mut source = single_band(ByteOrder::LittleEndian, &[(tags::PLANAR_CONFIGURATION, field_types::SHORT, 1, 2)]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();
    let err = RasterDescriptor::read(&reader, &mut source, tiff.full_resolution().unwrap()).unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::UnsupportedLayout);

    let mut source = single_band(ByteOrder::LittleEndian, &[(tags::ORIENTATION, field_types::SHORT, 1, 5)]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();
    let err = RasterDescriptor::read(&reader, &mut source, tiff.full_resolution().unwrap()).unwrap_err();
    std::assert_eq!(err.kind(), ErrorKind::UnsupportedLayout);
}

#[test]
fn test_missing_segments_is_error() {
    let mut source = single_band(ByteOrder::LittleEndian, &[(tags::ROWS_PER_STRIP, field_types::LONG, 1, 1)]);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut source).unwrap();

    // Two strips of one row, but only one offset
    std::assert!(RasterDescriptor::read(&reader, &mut source, tiff.full_resolution().unwrap()).is_err());
}
