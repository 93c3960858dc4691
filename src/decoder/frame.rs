//! Full-frame RGB output buffer

use crate::tiff::constants::orientation;
use crate::tiff::errors::{TiffError, TiffResult};

/// Channels per output pixel
pub const CHANNELS: usize = 3;

/// Destination raster, row-major RGB, always top-left
///
/// Pixels are placed by source coordinates; the frame mirrors them according
/// to the source orientation so row 0 is always the top of the image.
#[derive(Debug)]
pub struct OutputFrame {
    width: u32,
    height: u32,
    orientation: u16,
    data: Vec<u8>,
}

impl OutputFrame {
    /// Allocates a zeroed frame, failing cleanly if memory is short
    pub fn allocate(width: u32, height: u32, source_orientation: u16) -> TiffResult<Self> {
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(TiffError::Allocation { what: "output frame", bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| TiffError::Allocation { what: "output frame", bytes })?;
        data.resize(bytes, 0);

        Ok(OutputFrame { width, height, orientation: source_orientation, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maps a source pixel position to its top-left destination position
    fn target(&self, x: u32, y: u32) -> (u32, u32) {
        let mirror_x = self.width - 1 - x;
        let mirror_y = self.height - 1 - y;
        match self.orientation {
            orientation::TOP_RIGHT => (mirror_x, y),
            orientation::BOTTOM_RIGHT => (mirror_x, mirror_y),
            orientation::BOTTOM_LEFT => (x, mirror_y),
            _ => (x, y),
        }
    }

    /// Stores the encoded pixel for source position (x, y)
    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let (tx, ty) = self.target(x, y);
        let idx = (ty as usize * self.width as usize + tx as usize) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgb);
    }

    /// Encoded pixel at destination position (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Bytes of destination row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.row_bytes();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(orientation: u16) -> OutputFrame {
        let mut frame = OutputFrame::allocate(3, 2, orientation).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                frame.put(x, y, [0, y as u8, x as u8]);
            }
        }
        frame
    }

    #[test]
    fn test_top_left_keeps_positions() {
        let frame = filled(orientation::TOP_LEFT);
        assert_eq!(frame.pixel(0, 0), [0, 0, 0]);
        assert_eq!(frame.pixel(2, 1), [0, 1, 2]);
        assert_eq!(frame.row(1), &[0, 1, 0, 0, 1, 1, 0, 1, 2]);
    }

    #[test]
    fn test_orientation_mirrors() {
        let top_right = filled(orientation::TOP_RIGHT);
        assert_eq!(top_right.pixel(0, 0), [0, 0, 2]);

        let bottom_right = filled(orientation::BOTTOM_RIGHT);
        assert_eq!(bottom_right.pixel(0, 0), [0, 1, 2]);

        let bottom_left = filled(orientation::BOTTOM_LEFT);
        assert_eq!(bottom_left.pixel(0, 0), [0, 1, 0]);
        assert_eq!(bottom_left.pixel(2, 1), [0, 0, 2]);
    }

    #[test]
    fn test_oversized_frame_is_allocation_error() {
        let result = OutputFrame::allocate(u32::MAX, u32::MAX, orientation::TOP_LEFT);
        assert!(matches!(result, Err(TiffError::Allocation { what: "output frame", .. })));
    }
}
