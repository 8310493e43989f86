use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::batch::FinalBatchPolicy;
use crate::clock::Clock;
use crate::error::{ExtractError, Result};
use crate::pipeline::StreamOptions;
use crate::signal::SignalKind;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "vital-csv",
    version,
    about = "Extract ECG and accelerometer series from a vital log into CSV"
)]
pub struct Cli {
    /// Output directory for csv data
    #[arg(short = 'd', long = "outDir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also write the last batch of each stream, stamped with its own second
    #[arg(long)]
    pub flush_final_batch: bool,

    /// Render timestamps in UTC instead of the local time zone
    #[arg(long)]
    pub utc: bool,

    /// Optional TOML settings file
    #[arg(long, env = "VITAL_CSV_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Vital log database
    #[arg(value_name = "VITAL_DATA")]
    pub inputs: Vec<PathBuf>,
}

impl Cli {
    /// The input path, when exactly one was given.
    pub fn single_input(&self) -> Option<&Path> {
        match self.inputs.as_slice() {
            [input] => Some(input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub output: OutputConfig,
    pub extract: ExtractSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    pub flush_final_batch: bool,
    pub utc: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ExtractError::access(path, e))?;
        toml::from_str(&raw)
            .map_err(|e| ExtractError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

/// Settings for one run, after merging defaults, the settings file and the CLI.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub final_batch: FinalBatchPolicy,
    pub clock: Clock,
    pub logging: LoggingConfig,
}

impl ExtractConfig {
    pub fn from_cli(cli: &Cli, input: &Path) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, input, file))
    }

    pub fn merge(cli: &Cli, input: &Path, file: FileConfig) -> Self {
        let out_dir = cli
            .out_dir
            .clone()
            .or(file.output.dir)
            .unwrap_or_default();
        let final_batch = if cli.flush_final_batch || file.extract.flush_final_batch {
            FinalBatchPolicy::Flush
        } else {
            FinalBatchPolicy::Drop
        };
        let clock = if cli.utc || file.extract.utc {
            Clock::Utc
        } else {
            Clock::Local
        };
        let mut logging = file.logging;
        if let Some(level) = &cli.log_level {
            logging.level = level.clone();
        }
        Self {
            input: input.to_path_buf(),
            out_dir,
            final_batch,
            clock,
            logging,
        }
    }

    pub fn output_path(&self, kind: SignalKind) -> PathBuf {
        output_path(&self.out_dir, &self.input, kind)
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions {
            clock: self.clock,
            final_batch: self.final_batch,
        }
    }
}

/// `<out_dir>/<input stem><suffix>`, the stem being the file name without its
/// last extension.
pub fn output_path(out_dir: &Path, input: &Path, kind: SignalKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}{}", stem, kind.file_suffix()))
}
