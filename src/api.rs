use log::info;

use crate::config::Config;
use crate::converter::{ConversionReport, HeightmapConverter};
use crate::commands::InspectCommand;
use crate::encoder::{self, Sample};
use crate::tiff::errors::TiffResult;

/// Main interface to the hmapper library
pub struct Hmapper {
    converter: HeightmapConverter,
}

impl Hmapper {
    /// Create a new instance with the given configuration
    ///
    /// The library never installs a logger; binaries do that.
    pub fn new(config: Config) -> TiffResult<Self> {
        Ok(Hmapper { converter: HeightmapConverter::new(config)? })
    }

    /// Create an instance from a TOML configuration file
    pub fn from_config_file(path: &str) -> TiffResult<Self> {
        Self::new(Config::from_file(path)?)
    }

    /// Describe a source file's structure and georeferencing
    ///
    /// # Returns
    /// The same text the `--inspect` flag prints
    pub fn analyze(&self, input_path: &str) -> TiffResult<String> {
        let info = self.converter.inspect(input_path)?;
        Ok(InspectCommand::render(&info))
    }

    /// Encode `input_path` into an RGB heightmap at `output_path`
    pub fn encode(&self, input_path: &str, output_path: &str) -> TiffResult<ConversionReport> {
        let report = self.converter.convert(input_path, output_path)?;
        info!("Encoded {} into {}", input_path, output_path);
        Ok(report)
    }

    /// Encode a single sample with this instance's settings
    pub fn encode_sample(&self, sample: Sample) -> TiffResult<[u8; 3]> {
        encoder::encode(sample, &self.converter.config().encoding)
    }
}
