//! Source inspection command
//!
//! Prints the raster descriptor and the georeferencing tags of the input,
//! the same view the converter works from.

use clap::ArgMatches;

use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::converter::{HeightmapConverter, SourceInfo};
use crate::tiff::errors::{TiffError, TiffResult};

/// Command for describing a source file
pub struct InspectCommand {
    input_file: String,
    converter: HeightmapConverter,
}

impl InspectCommand {
    pub fn new(args: &ArgMatches, config: Config) -> TiffResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(InspectCommand {
            input_file,
            converter: HeightmapConverter::new(config)?,
        })
    }

    /// Formats the report printed to stdout
    pub fn render(info: &SourceInfo) -> String {
        let mut result = String::from("TIFF Analysis Results:\n");
        result.push_str(&format!("  Format: {}\n", if info.is_big_tiff { "BigTIFF" } else { "TIFF" }));
        result.push_str(&format!("  Byte order: {}\n", info.byte_order.name()));
        result.push_str(&format!("  Number of IFDs: {}\n", info.ifd_count));
        match info.descriptor.numeric_kind() {
            Ok(kind) => result.push_str(&format!("  Sample type: {} (convertible)\n", kind)),
            Err(e) => result.push_str(&format!("  Sample type: not convertible ({})\n", e)),
        }
        result.push_str(&info.descriptor.to_string());
        result.push_str(&info.geo.to_string());
        result
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> TiffResult<()> {
        let info = self.converter.inspect(&self.input_file)?;
        print!("{}", Self::render(&info));
        Ok(())
    }
}
