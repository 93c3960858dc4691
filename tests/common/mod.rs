//! Hand-built source TIFFs and a reader for converter output

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use hmapper::compression::{CompressionFactory, CompressionHandler, UncompressedHandler};
use hmapper::tiff::constants::{field_types, tags};
use hmapper::TiffReader;

/// Sample values of a single-band source, row-major
#[derive(Debug, Clone)]
pub enum SampleData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl SampleData {
    fn len(&self) -> usize {
        match self {
            SampleData::U8(v) => v.len(),
            SampleData::U16(v) => v.len(),
            SampleData::U32(v) => v.len(),
            SampleData::I16(v) => v.len(),
            SampleData::I32(v) => v.len(),
            SampleData::F32(v) => v.len(),
            SampleData::F64(v) => v.len(),
        }
    }

    /// (SampleFormat, BitsPerSample)
    fn format(&self) -> (u16, u16) {
        match self {
            SampleData::U8(_) => (1, 8),
            SampleData::U16(_) => (1, 16),
            SampleData::U32(_) => (1, 32),
            SampleData::I16(_) => (2, 16),
            SampleData::I32(_) => (2, 32),
            SampleData::F32(_) => (3, 32),
            SampleData::F64(_) => (3, 64),
        }
    }

    fn bytes_per_sample(&self) -> usize {
        self.format().1 as usize / 8
    }

    fn to_bytes(&self, big_endian: bool) -> Vec<u8> {
        macro_rules! encode {
            ($values:expr) => {
                $values.iter()
                    .flat_map(|v| if big_endian { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() })
                    .collect()
            };
        }
        match self {
            SampleData::U8(v) => v.clone(),
            SampleData::U16(v) => encode!(v),
            SampleData::U32(v) => encode!(v),
            SampleData::I16(v) => encode!(v),
            SampleData::I32(v) => encode!(v),
            SampleData::F32(v) => encode!(v),
            SampleData::F64(v) => encode!(v),
        }
    }
}

/// Extra tag values, written in the file's byte order
#[derive(Debug, Clone)]
pub enum TagValue {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Doubles(Vec<f64>),
    /// Written with a NUL terminator
    Ascii(String),
    /// ASCII entry holding arbitrary bytes, NUL-terminated
    AsciiBytes(Vec<u8>),
}

#[derive(Debug, Clone, Copy)]
pub enum SourceLayout {
    Strips { rows_per_strip: u32 },
    Tiles { tile_width: u32, tile_length: u32 },
}

/// Description of a source file to build
#[derive(Debug, Clone)]
pub struct SourceTiff {
    pub width: u32,
    pub height: u32,
    pub data: SampleData,
    pub big_endian: bool,
    pub big_tiff: bool,
    pub layout: SourceLayout,
    pub compression: u16,
    pub predictor: u16,
    pub orientation: Option<u16>,
    pub samples_per_pixel: u16,
    /// Replaces the SampleFormat derived from `data`
    pub sample_format: Option<u16>,
    pub extra_tags: Vec<(u16, TagValue)>,
}

impl SourceTiff {
    /// Little-endian classic TIFF, one row per strip, uncompressed
    pub fn new(width: u32, height: u32, data: SampleData) -> Self {
        assert_eq!(data.len(), (width * height) as usize);
        SourceTiff {
            width,
            height,
            data,
            big_endian: false,
            big_tiff: false,
            layout: SourceLayout::Strips { rows_per_strip: 1 },
            compression: 1,
            predictor: 1,
            orientation: None,
            samples_per_pixel: 1,
            sample_format: None,
            extra_tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: u16, value: TagValue) -> Self {
        self.extra_tags.push((tag, value));
        self
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.to_bytes()).unwrap();
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let header_size = if self.big_tiff { 16 } else { 8 };
        let mut body = Vec::new();

        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for segment in self.segments() {
            offsets.push((header_size + body.len()) as u64);
            counts.push(segment.len() as u64);
            body.extend_from_slice(&segment);
        }

        let (format, bits) = self.data.format();
        let spp = self.samples_per_pixel as usize;
        let mut entries: Vec<(u16, u16, u64, Vec<u8>)> = vec![
            self.entry(tags::IMAGE_WIDTH, &TagValue::Longs(vec![self.width])),
            self.entry(tags::IMAGE_LENGTH, &TagValue::Longs(vec![self.height])),
            self.entry(tags::BITS_PER_SAMPLE, &TagValue::Shorts(vec![bits; spp])),
            self.entry(tags::COMPRESSION, &TagValue::Shorts(vec![self.compression])),
            self.entry(tags::PHOTOMETRIC_INTERPRETATION, &TagValue::Shorts(vec![1])),
            self.entry(tags::SAMPLES_PER_PIXEL, &TagValue::Shorts(vec![self.samples_per_pixel])),
            self.entry(tags::PLANAR_CONFIGURATION, &TagValue::Shorts(vec![1])),
            self.entry(tags::SAMPLE_FORMAT, &TagValue::Shorts(vec![self.sample_format.unwrap_or(format); spp])),
        ];
        if self.predictor != 1 {
            entries.push(self.entry(tags::PREDICTOR, &TagValue::Shorts(vec![self.predictor])));
        }
        if let Some(orientation) = self.orientation {
            entries.push(self.entry(tags::ORIENTATION, &TagValue::Shorts(vec![orientation])));
        }

        let (offset_tag, count_tag) = match self.layout {
            SourceLayout::Strips { rows_per_strip } => {
                entries.push(self.entry(tags::ROWS_PER_STRIP, &TagValue::Longs(vec![rows_per_strip])));
                (tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
            }
            SourceLayout::Tiles { tile_width, tile_length } => {
                entries.push(self.entry(tags::TILE_WIDTH, &TagValue::Longs(vec![tile_width])));
                entries.push(self.entry(tags::TILE_LENGTH, &TagValue::Longs(vec![tile_length])));
                (tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
            }
        };
        entries.push(self.offsets_entry(offset_tag, &offsets));
        entries.push(self.offsets_entry(count_tag, &counts));

        for (tag, value) in &self.extra_tags {
            entries.push(self.entry(*tag, value));
        }
        entries.sort_by_key(|e| e.0);

        // Out-of-line values, then the IFD
        let inline_max = if self.big_tiff { 8 } else { 4 };
        let mut fields = Vec::new();
        for (_, _, _, data) in &entries {
            if data.len() > inline_max {
                if body.len() % 2 == 1 {
                    body.push(0);
                }
                let offset = (header_size + body.len()) as u64;
                body.extend_from_slice(data);
                fields.push(self.offset_bytes(offset));
            } else {
                let mut field = data.clone();
                field.resize(inline_max, 0);
                fields.push(field);
            }
        }
        if body.len() % 2 == 1 {
            body.push(0);
        }
        let ifd_offset = (header_size + body.len()) as u64;

        let mut out = Vec::new();
        out.extend_from_slice(if self.big_endian { b"MM" } else { b"II" });
        if self.big_tiff {
            self.put_u16(&mut out, 43);
            self.put_u16(&mut out, 8);
            self.put_u16(&mut out, 0);
            self.put_u64(&mut out, ifd_offset);
        } else {
            self.put_u16(&mut out, 42);
            self.put_u32(&mut out, ifd_offset as u32);
        }
        out.extend_from_slice(&body);

        if self.big_tiff {
            self.put_u64(&mut out, entries.len() as u64);
        } else {
            self.put_u16(&mut out, entries.len() as u16);
        }
        for ((tag, field_type, count, _), field) in entries.iter().zip(&fields) {
            self.put_u16(&mut out, *tag);
            self.put_u16(&mut out, *field_type);
            if self.big_tiff {
                self.put_u64(&mut out, *count);
            } else {
                self.put_u32(&mut out, *count as u32);
            }
            out.extend_from_slice(field);
        }
        if self.big_tiff {
            self.put_u64(&mut out, 0);
        } else {
            self.put_u32(&mut out, 0);
        }
        out
    }

    /// Encoded strips or tiles, predictor applied then compressed
    fn segments(&self) -> Vec<Vec<u8>> {
        let width = self.data.bytes_per_sample();
        let samples = self.data.to_bytes(self.big_endian);
        let row_bytes = self.width as usize * width;

        let raw: Vec<(Vec<u8>, usize)> = match self.layout {
            SourceLayout::Strips { rows_per_strip } => samples
                .chunks(rows_per_strip as usize * row_bytes)
                .map(|chunk| (chunk.to_vec(), self.width as usize))
                .collect(),
            SourceLayout::Tiles { tile_width, tile_length } => {
                let mut tiles = Vec::new();
                for ty in (0..self.height).step_by(tile_length as usize) {
                    for tx in (0..self.width).step_by(tile_width as usize) {
                        let mut tile = vec![0u8; (tile_width * tile_length) as usize * width];
                        for row in 0..tile_length.min(self.height - ty) {
                            let cols = tile_width.min(self.width - tx) as usize;
                            let src = (ty + row) as usize * row_bytes + tx as usize * width;
                            let dst = row as usize * tile_width as usize * width;
                            tile[dst..dst + cols * width].copy_from_slice(&samples[src..src + cols * width]);
                        }
                        tiles.push((tile, tile_width as usize));
                    }
                }
                tiles
            }
        };

        // Codes the crate cannot decode are stored raw; the converter rejects them anyway
        let codec: Box<dyn CompressionHandler> = CompressionFactory::create_handler(self.compression as u64)
            .unwrap_or_else(|_| Box::new(UncompressedHandler));
        raw.into_iter()
            .map(|(mut data, row_samples)| {
                for row in data.chunks_exact_mut(row_samples * width) {
                    match self.predictor {
                        2 => self.difference_samples(row, width),
                        3 => self.difference_planes(row, row_samples, width),
                        _ => {}
                    }
                }
                codec.compress(&data).unwrap()
            })
            .collect()
    }

    fn difference_samples(&self, row: &mut [u8], width: usize) {
        let values: Vec<u64> = row.chunks_exact(width).map(|s| self.read_uint(s)).collect();
        let mask = if width == 8 { u64::MAX } else { (1u64 << (width * 8)) - 1 };
        for (i, sample) in row.chunks_exact_mut(width).enumerate().skip(1) {
            let diff = values[i].wrapping_sub(values[i - 1]) & mask;
            self.write_uint(sample, diff);
        }
    }

    fn difference_planes(&self, row: &mut [u8], row_samples: usize, width: usize) {
        let mut planes = vec![0u8; row.len()];
        for sample in 0..row_samples {
            for significance in 0..width {
                let position = if self.big_endian { significance } else { width - 1 - significance };
                planes[significance * row_samples + sample] = row[sample * width + position];
            }
        }
        for i in (1..planes.len()).rev() {
            planes[i] = planes[i].wrapping_sub(planes[i - 1]);
        }
        row.copy_from_slice(&planes);
    }

    fn read_uint(&self, bytes: &[u8]) -> u64 {
        if self.big_endian {
            bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u64)
        } else {
            bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | b as u64)
        }
    }

    fn write_uint(&self, bytes: &mut [u8], value: u64) {
        let width = bytes.len();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let shift = if self.big_endian { (width - 1 - i) * 8 } else { i * 8 };
            *byte = (value >> shift) as u8;
        }
    }

    fn entry(&self, tag: u16, value: &TagValue) -> (u16, u16, u64, Vec<u8>) {
        let mut data = Vec::new();
        match value {
            TagValue::Shorts(v) => {
                v.iter().for_each(|&x| self.put_u16(&mut data, x));
                (tag, field_types::SHORT, v.len() as u64, data)
            }
            TagValue::Longs(v) => {
                v.iter().for_each(|&x| self.put_u32(&mut data, x));
                (tag, field_types::LONG, v.len() as u64, data)
            }
            TagValue::Doubles(v) => {
                v.iter().for_each(|&x| self.put_u64(&mut data, x.to_bits()));
                (tag, field_types::DOUBLE, v.len() as u64, data)
            }
            TagValue::Ascii(s) => {
                data.extend_from_slice(s.as_bytes());
                data.push(0);
                (tag, field_types::ASCII, data.len() as u64, data)
            }
            TagValue::AsciiBytes(bytes) => {
                data.extend_from_slice(bytes);
                data.push(0);
                (tag, field_types::ASCII, data.len() as u64, data)
            }
        }
    }

    fn offsets_entry(&self, tag: u16, values: &[u64]) -> (u16, u16, u64, Vec<u8>) {
        if self.big_tiff {
            let mut data = Vec::new();
            values.iter().for_each(|&v| self.put_u64(&mut data, v));
            (tag, field_types::LONG8, values.len() as u64, data)
        } else {
            self.entry(tag, &TagValue::Longs(values.iter().map(|&v| v as u32).collect()))
        }
    }

    fn offset_bytes(&self, offset: u64) -> Vec<u8> {
        let mut field = Vec::new();
        if self.big_tiff {
            self.put_u64(&mut field, offset);
        } else {
            self.put_u32(&mut field, offset as u32);
        }
        field
    }

    fn put_u16(&self, out: &mut Vec<u8>, v: u16) {
        if self.big_endian { out.write_u16::<BigEndian>(v).unwrap() } else { out.write_u16::<LittleEndian>(v).unwrap() }
    }

    fn put_u32(&self, out: &mut Vec<u8>, v: u32) {
        if self.big_endian { out.write_u32::<BigEndian>(v).unwrap() } else { out.write_u32::<LittleEndian>(v).unwrap() }
    }

    fn put_u64(&self, out: &mut Vec<u8>, v: u64) {
        if self.big_endian { out.write_u64::<BigEndian>(v).unwrap() } else { out.write_u64::<LittleEndian>(v).unwrap() }
    }
}

/// A converter output, decoded
pub struct OutputImage {
    pub width: u32,
    pub height: u32,
    /// RGB bytes, row-major
    pub pixels: Vec<u8>,
    pub strip_count: usize,
    pub rows_per_strip: u64,
    pub samples_per_pixel: u64,
    pub bits_per_sample: Vec<u16>,
    pub photometric: u64,
    pub compression: u64,
    pub is_big_tiff: bool,
    pub reader: TiffReader,
    pub ifd: hmapper::tiff::IFD,
    pub bytes: Vec<u8>,
}

impl OutputImage {
    pub fn read(path: &Path) -> OutputImage {
        let bytes = fs::read(path).unwrap();
        let mut cursor = Cursor::new(bytes.clone());
        let mut reader = TiffReader::new();
        let tiff = reader.read(&mut cursor).unwrap();
        assert_eq!(tiff.ifd_count(), 1);
        let ifd = tiff.full_resolution().unwrap().clone();

        let (width, height) = ifd.get_dimensions().unwrap();
        let offsets = reader.read_tag_values(&mut cursor, &ifd, tags::STRIP_OFFSETS).unwrap();
        let counts = reader.read_tag_values(&mut cursor, &ifd, tags::STRIP_BYTE_COUNTS).unwrap();
        assert_eq!(offsets.len(), counts.len());

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap();
        let codec = CompressionFactory::create_handler(compression).unwrap();
        let mut pixels = Vec::new();
        for (&offset, &count) in offsets.iter().zip(&counts) {
            let strip = &bytes[offset as usize..(offset + count) as usize];
            pixels.extend(codec.decompress(strip).unwrap());
        }

        OutputImage {
            width: width as u32,
            height: height as u32,
            pixels,
            strip_count: offsets.len(),
            rows_per_strip: ifd.get_tag_value(tags::ROWS_PER_STRIP).unwrap(),
            samples_per_pixel: ifd.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap(),
            bits_per_sample: reader.read_tag_shorts(&mut cursor, &ifd, tags::BITS_PER_SAMPLE).unwrap(),
            photometric: ifd.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION).unwrap(),
            compression,
            is_big_tiff: tiff.is_big_tiff,
            reader,
            ifd,
            bytes,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y * self.width + x) as usize * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn pixel_list(&self) -> Vec<[u8; 3]> {
        self.pixels.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect()
    }

    /// Raw value bytes of a tag as stored (output is little-endian)
    pub fn tag_bytes(&self, tag: u16) -> Vec<u8> {
        let entry = self.ifd.get_entry(tag).unwrap();
        let mut cursor = Cursor::new(self.bytes.clone());
        self.reader.read_entry_bytes(&mut cursor, entry).unwrap()
    }
}
