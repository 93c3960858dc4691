//! Run configuration
//!
//! Settings come from an optional TOML file, parsed into a `toml::Value`
//! and read table by table. Unknown keys are ignored so files can be shared
//! with other tools. Command-line flags are applied on top through
//! [`ConfigOverrides`].

use std::fs;
use std::str::FromStr;
use log::{debug, LevelFilter};

use crate::compression::DEFAULT_ZSTD_LEVEL;
use crate::encoder::{EncodingConfig, NarrowPolicy, SignedPolicy};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::logger::Logger;

/// Destination strip settings
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Output codec name: none, deflate or zstd
    pub compression: String,
    pub zstd_level: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            compression: "none".to_string(),
            zstd_level: DEFAULT_ZSTD_LEVEL,
        }
    }
}

/// Logging and progress settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub file: Option<String>,
    /// Whether to draw progress bars
    pub progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LevelFilter::Info,
            file: None,
            progress: true,
        }
    }
}

/// Complete configuration of a conversion run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub encoding: EncodingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub multiplier: Option<f64>,
    pub narrow_policy: Option<NarrowPolicy>,
    pub signed_policy: Option<SignedPolicy>,
    pub compression: Option<String>,
    pub level: Option<LevelFilter>,
    pub log_file: Option<String>,
    pub progress: Option<bool>,
}

impl Config {
    /// Loads a configuration file
    pub fn from_file(path: &str) -> TiffResult<Self> {
        debug!("Loading configuration from {}", path);
        let content = fs::read_to_string(path)
            .map_err(|e| TiffError::Config(format!("cannot read {}: {}", path, e)))?;
        content.parse()
    }

    /// Applies command-line values and checks the result
    pub fn apply(&mut self, overrides: ConfigOverrides) -> TiffResult<()> {
        if let Some(multiplier) = overrides.multiplier {
            self.encoding.multiplier = multiplier;
        }
        if let Some(policy) = overrides.narrow_policy {
            self.encoding.narrow_policy = policy;
        }
        if let Some(policy) = overrides.signed_policy {
            self.encoding.signed_policy = policy;
        }
        if let Some(compression) = overrides.compression {
            self.output.compression = compression;
        }
        if let Some(level) = overrides.level {
            self.logging.level = level;
        }
        if overrides.log_file.is_some() {
            self.logging.file = overrides.log_file;
        }
        if let Some(progress) = overrides.progress {
            self.logging.progress = progress;
        }
        self.validate()
    }

    /// Checks every value that is not enforced by its type
    pub fn validate(&self) -> TiffResult<()> {
        self.encoding.validate()?;

        match self.output.compression.to_ascii_lowercase().as_str() {
            "none" | "uncompressed" | "deflate" | "zip" | "zstd" => {}
            other => return Err(TiffError::Config(format!(
                "unknown output compression '{}' (expected none, deflate or zstd)", other))),
        }

        if !(1..=22).contains(&self.output.zstd_level) {
            return Err(TiffError::Config(format!(
                "zstd_level {} outside 1..=22", self.output.zstd_level)));
        }
        Ok(())
    }

    fn read_encoding(&mut self, table: &toml::Value) -> TiffResult<()> {
        if let Some(value) = table.get("multiplier") {
            // Integers are accepted as well
            self.encoding.multiplier = value.as_float()
                .or_else(|| value.as_integer().map(|i| i as f64))
                .ok_or_else(|| invalid("encoding.multiplier", "a number", value))?;
        }
        if let Some(value) = table.get("narrow_policy") {
            self.encoding.narrow_policy = string_value("encoding.narrow_policy", value)?.parse()?;
        }
        if let Some(value) = table.get("signed_policy") {
            self.encoding.signed_policy = string_value("encoding.signed_policy", value)?.parse()?;
        }
        Ok(())
    }

    fn read_output(&mut self, table: &toml::Value) -> TiffResult<()> {
        if let Some(value) = table.get("compression") {
            self.output.compression = string_value("output.compression", value)?.to_string();
        }
        if let Some(value) = table.get("zstd_level") {
            let level = value.as_integer()
                .ok_or_else(|| invalid("output.zstd_level", "an integer", value))?;
            self.output.zstd_level = i32::try_from(level)
                .map_err(|_| invalid("output.zstd_level", "an integer in 1..=22", value))?;
        }
        Ok(())
    }

    fn read_logging(&mut self, table: &toml::Value) -> TiffResult<()> {
        if let Some(value) = table.get("level") {
            let name = string_value("logging.level", value)?;
            self.logging.level = Logger::parse_level(name)
                .ok_or_else(|| invalid("logging.level", "one of error, warn, info, debug, trace", value))?;
        }
        if let Some(value) = table.get("file") {
            self.logging.file = Some(string_value("logging.file", value)?.to_string());
        }
        if let Some(value) = table.get("progress") {
            self.logging.progress = value.as_bool()
                .ok_or_else(|| invalid("logging.progress", "a boolean", value))?;
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = TiffError;

    /// Parses TOML text; missing sections and keys keep their defaults
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| TiffError::Config(format!("invalid TOML: {}", e)))?;

        let mut config = Config::default();
        if let Some(table) = section(&toml_value, "encoding")? {
            config.read_encoding(table)?;
        }
        if let Some(table) = section(&toml_value, "output")? {
            config.read_output(table)?;
        }
        if let Some(table) = section(&toml_value, "logging")? {
            config.read_logging(table)?;
        }

        config.validate()?;
        debug!("Configuration: {:?}", config);
        Ok(config)
    }
}

fn section<'v>(root: &'v toml::Value, name: &str) -> TiffResult<Option<&'v toml::Value>> {
    match root.get(name) {
        Some(value) if value.is_table() => Ok(Some(value)),
        Some(value) => Err(invalid(name, "a table", value)),
        None => Ok(None),
    }
}

fn string_value<'v>(key: &str, value: &'v toml::Value) -> TiffResult<&'v str> {
    value.as_str().ok_or_else(|| invalid(key, "a string", value))
}

fn invalid(key: &str, expected: &str, found: &toml::Value) -> TiffError {
    TiffError::Config(format!("{} must be {}, found {}", key, expected, found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.encoding.multiplier, 100.0);
        assert_eq!(config.output.compression, "none");
    }

    #[test]
    fn test_full_file() {
        let config: Config = r#"
            [encoding]
            multiplier = 10
            narrow_policy = "rescale"
            signed_policy = "offset"
            unknown = "ignored"

            [output]
            compression = "zstd"
            zstd_level = 9

            [logging]
            level = "debug"
            file = "run.log"
            progress = false

            [other_tool]
            anything = 1
        "#.parse().unwrap();

        assert_eq!(config.encoding.multiplier, 10.0);
        assert_eq!(config.encoding.narrow_policy, NarrowPolicy::Rescale);
        assert_eq!(config.encoding.signed_policy, SignedPolicy::Offset);
        assert_eq!(config.output.compression, "zstd");
        assert_eq!(config.output.zstd_level, 9);
        assert_eq!(config.logging.level, LevelFilter::Debug);
        assert_eq!(config.logging.file.as_deref(), Some("run.log"));
        assert!(!config.logging.progress);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for text in [
            "[encoding]\nmultiplier = 0.0",
            "[encoding]\nmultiplier = \"big\"",
            "[encoding]\nnarrow_policy = \"stretch\"",
            "[output]\ncompression = \"lzw\"",
            "[output]\nzstd_level = 40",
            "[logging]\nlevel = \"loud\"",
            "encoding = 3",
            "[encoding",
        ] {
            let result: TiffResult<Config> = text.parse();
            assert!(matches!(result, Err(TiffError::Config(_))), "{:?} should be rejected", text);
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut config: Config = "[encoding]\nmultiplier = 10.0\n[output]\ncompression = \"deflate\"".parse().unwrap();
        config.apply(ConfigOverrides {
            multiplier: Some(1000.0),
            compression: Some("zstd".to_string()),
            progress: Some(false),
            ..Default::default()
        }).unwrap();

        assert_eq!(config.encoding.multiplier, 1000.0);
        assert_eq!(config.output.compression, "zstd");
        assert!(!config.logging.progress);

        let bad = ConfigOverrides { multiplier: Some(f64::NAN), ..Default::default() };
        assert!(config.apply(bad).is_err());
    }
}
