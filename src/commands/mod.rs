//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod encode_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use encode_command::EncodeCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;
use crate::config::{Config, ConfigOverrides};
use crate::encoder::{NarrowPolicy, SignedPolicy};
use crate::tiff::errors::TiffResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
#[derive(Default)]
pub struct HmapperCommandFactory;

impl HmapperCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        HmapperCommandFactory
    }
}

impl CommandFactory for HmapperCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: Config) -> TiffResult<Box<dyn Command>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args, config)?))
        } else {
            Ok(Box::new(EncodeCommand::new(args, config)?))
        }
    }
}

/// Builds the run configuration: file values first, then command-line flags
pub fn config_from_args(args: &ArgMatches) -> TiffResult<Config> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let overrides = ConfigOverrides {
        multiplier: args.get_one::<f64>("multiplier").copied(),
        narrow_policy: args.get_one::<String>("narrow-policy").map(|s| s.parse::<NarrowPolicy>()).transpose()?,
        signed_policy: args.get_one::<String>("signed-policy").map(|s| s.parse::<SignedPolicy>()).transpose()?,
        compression: args.get_one::<String>("compression").cloned(),
        level: if args.get_flag("verbose") {
            Some(log::LevelFilter::Debug)
        } else if args.get_flag("quiet") {
            Some(log::LevelFilter::Warn)
        } else {
            None
        },
        log_file: args.get_one::<String>("log-file").cloned(),
        progress: if args.get_flag("quiet") { Some(false) } else { None },
    };

    config.apply(overrides)?;
    Ok(config)
}

/// Installs the global logger described by `config`
pub fn init_logging(config: &Config) -> TiffResult<()> {
    Logger::init_global_logger(config.logging.level, config.logging.file.as_deref())?;
    Ok(())
}
