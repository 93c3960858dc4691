//! Heightmap encoding command
//!
//! Converts the input elevation TIFF into an RGB-encoded heightmap.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::converter::HeightmapConverter;
use crate::tiff::errors::{TiffError, TiffResult};

/// Command for encoding a heightmap
pub struct EncodeCommand {
    input_file: String,
    output_file: String,
    converter: HeightmapConverter,
}

impl EncodeCommand {
    /// Create a new encode command
    ///
    /// Both the input and the output path are required.
    pub fn new(args: &ArgMatches, config: Config) -> TiffResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();
        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| TiffError::Config("an OUTPUT path is required unless --inspect is given".to_string()))?
            .clone();

        Ok(EncodeCommand {
            input_file,
            output_file,
            converter: HeightmapConverter::new(config)?,
        })
    }
}

impl Command for EncodeCommand {
    fn execute(&self) -> TiffResult<()> {
        let report = self.converter.convert(&self.input_file, &self.output_file)?;
        info!("Encoded {} {}x{} samples into {} ({} bytes{})",
              report.kind, report.width, report.height, self.output_file, report.bytes,
              if report.big_tiff { ", BigTIFF" } else { "" });
        Ok(())
    }
}
