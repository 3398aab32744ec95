use std::path::Path;

use config::Config as eConfig;
use eyre::{bail, Result, WrapErr};
use serde_derive::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::routines::measure::Workload;
use crate::routines::output::OutputFile;

/// Settings for a measurement run
///
/// Every field has a default, so an empty file (or no file at all) is a valid configuration.
/// See [read_settings] for how files and environment variables are combined.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Config {
    /// Measured iterations per workload
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Iterations run and discarded before measuring
    #[serde(default = "default_warmup")]
    pub warmup: u64,
    /// Workloads to measure, in order
    #[serde(default = "default_workloads")]
    pub workloads: Vec<Workload>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iterations: default_iterations(),
            warmup: default_warmup(),
            workloads: default_workloads(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_true")]
    pub stdout: bool,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: default_log_level(),
            file: default_log_file(),
            stdout: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Output {
    #[serde(default = "default_true")]
    pub write: bool,
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            write: true,
            path: default_output_path(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Settings::default()
    }

    /// Check the settings for values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.config.workloads.is_empty() {
            bail!("No workloads configured - set `workloads` in the [config] section");
        }

        self.log
            .level
            .parse::<LevelFilter>()
            .wrap_err_with(|| format!("Invalid log level: {}", self.log.level))?;

        Ok(())
    }

    /// Write the effective settings to `file_name` in the output folder, as pretty JSON
    pub fn write(&self, file_name: &str) -> Result<()> {
        let serialized =
            serde_json::to_string_pretty(self).wrap_err("Failed to serialize settings")?;

        let outputfile = OutputFile::new(&self.output.path, file_name)?;
        std::io::Write::write_all(&mut outputfile.file(), serialized.as_bytes())
            .wrap_err_with(|| format!("Failed to write {:?}", outputfile.relative_path()))?;
        Ok(())
    }
}

/// Read settings from a TOML file, with `ESCAPE_`-prefixed environment variables layered on top
///
/// Environment variables follow the section layout, e.g. `ESCAPE_CONFIG_ITERATIONS=500`
/// or `ESCAPE_LOG_LEVEL=debug`.
pub fn read_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Settings file {:?} does not exist", path);
    }

    let parsed = eConfig::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .add_source(
            config::Environment::with_prefix("ESCAPE")
                .separator("_")
                .try_parsing(true),
        )
        .build()
        .wrap_err_with(|| format!("Failed to read settings from {:?}", path))?;

    let settings: Settings = parsed
        .try_deserialize()
        .wrap_err_with(|| format!("Failed to parse settings from {:?}", path))?;

    Ok(settings)
}

// *********************************
// Default values for deserializing
// *********************************
fn default_true() -> bool {
    true
}

fn default_iterations() -> u64 {
    1_000_000
}

fn default_warmup() -> u64 {
    10_000
}

fn default_workloads() -> Vec<Workload> {
    vec![Workload::Escape, Workload::NoEscape]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "escape.log".to_string()
}

fn default_output_path() -> String {
    "outputs/".to_string()
}
