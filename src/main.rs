use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use std::process;
use log::error;

use hmapper::commands::{self, CommandFactory, HmapperCommandFactory};

fn main() {
    let matches = ClapCommand::new("hmapper")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Encode single-band elevation TIFFs as 24-bit RGB heightmaps")
        .arg(
            Arg::new("input")
                .help("Input TIFF file")
                .value_name("INPUT")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Output RGB TIFF file")
                .value_name("OUTPUT")
                .required_unless_present("inspect")
                .index(2),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("multiplier")
                .short('m')
                .long("multiplier")
                .help("Fixed-point multiplier for float samples (overrides config)")
                .value_name("F")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("narrow-policy")
                .long("narrow-policy")
                .help("Encoding of 8/16-bit unsigned samples")
                .value_name("POLICY")
                .value_parser(["identity", "shift", "rescale"]),
        )
        .arg(
            Arg::new("signed-policy")
                .long("signed-policy")
                .help("Encoding of signed integer samples")
                .value_name("POLICY")
                .value_parser(["clamp", "offset"]),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .help("Output strip compression")
                .value_name("NAME")
                .value_parser(["none", "deflate", "zstd"]),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Print the raster descriptor and geo metadata of INPUT")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide progress bars and log warnings only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records to this file")
                .value_name("FILE"),
        )
        .get_matches();

    let config = match commands::config_from_args(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error ({}): {}", e.kind().label(), e);
            process::exit(1);
        }
    };

    if let Err(e) = commands::init_logging(&config) {
        eprintln!("Error setting up logger: {}", e);
        process::exit(1);
    }

    let factory = HmapperCommandFactory::new();

    let command_result = factory.create_command(&matches, config);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error ({}): {}", e.kind().label(), e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error ({}): {}", e.kind().label(), e);
            process::exit(1);
        }
    };
}
