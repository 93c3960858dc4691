//! Basic TIFF tag strategies
//!
//! This module adds the fixed layout tags of an encoded heightmap:
//! three 8-bit channels, top-left, interleaved, one row per strip.

use crate::tiff::TiffBuilder;
use crate::tiff::constants::{tags, photometric, planar_config, orientation};
use log::info;

/// Value written to the Software tag
pub const SOFTWARE_NAME: &str = concat!("hmapper ", env!("CARGO_PKG_VERSION"));

/// Adds basic TIFF tags to the destination IFD
pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Add the destination geometry and layout tags
    ///
    /// Strip offsets and byte counts are not known until the strips are
    /// written, so the writer adds them.
    pub fn add_rgb_output_tags(builder: &mut TiffBuilder, width: u32, height: u32, compression: u16) {
        info!("Adding RGB output tags for {}x{} image", width, height);

        builder.add_long(tags::IMAGE_WIDTH, width);
        builder.add_long(tags::IMAGE_LENGTH, height);

        // Three 8-bit channels carry the 24-bit height
        builder.add_shorts(tags::BITS_PER_SAMPLE, &[8, 8, 8]);
        builder.add_short(tags::SAMPLES_PER_PIXEL, 3);

        builder.add_short(tags::COMPRESSION, compression);
        builder.add_short(tags::PHOTOMETRIC_INTERPRETATION, photometric::RGB);
        builder.add_short(tags::ORIENTATION, orientation::TOP_LEFT);
        builder.add_short(tags::PLANAR_CONFIGURATION, planar_config::CHUNKY);

        // One row per strip
        builder.add_long(tags::ROWS_PER_STRIP, 1);

        builder.add_ascii(tags::SOFTWARE, SOFTWARE_NAME);
    }
}
