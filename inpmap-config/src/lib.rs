//! Configuration for the inpmap tools
//!
//! Settings come in layers, each one overriding the keys it sets:
//!
//! 1. `defaults/inpmap.default.toml`, compiled in with `include_str!`;
//! 2. [`LOCAL_FILE`] in the working directory, if there is one;
//! 3. a file named on the command line (`--config`), which must exist;
//! 4. individual flags (`--log-level`, `-f`, `--allow-errors`).
//!
//! [`Loader`] stacks the layers and deserializes the result into [`MapperConfig`]. A key
//! with the wrong type or an unknown log level fails the build instead of falling back to
//! a default.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/inpmap.default.toml");

/// Per-project settings file looked up in the working directory.
pub const LOCAL_FILE: &str = "inpmap.toml";

mod keys {
    pub const OUTPUT_FILE: &str = "generate.output_file";
    pub const ABORT_ON_ERROR: &str = "generate.abort_on_error";
    pub const LOG_LEVEL: &str = "logging.level";
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapperConfig {
    pub generate: GenerateConfig,
    pub logging: LoggingConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateConfig {
    /// Where `generate` writes the interface document when no `-f` is given.
    pub output_file: PathBuf,
    /// Stop before writing when the model has validation errors.
    pub abort_on_error: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    pub list_sections: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer stack for [`MapperConfig`], lowest priority first.
///
/// ```rust,ignore
/// let config = Loader::new()
///     .with_local_file(std::env::current_dir()?)
///     .with_log_level("debug")?
///     .allow_errors()?
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the compiled-in defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layers `dir/inpmap.toml` when it exists.
    pub fn with_local_file(self, dir: impl AsRef<Path>) -> Self {
        self.with_optional_file(dir.as_ref().join(LOCAL_FILE))
    }

    /// Layers a TOML file that must exist; a missing file fails [`Loader::build`].
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// `--log-level`. The name is checked when the configuration is built.
    pub fn with_log_level(self, level: &str) -> Result<Self, ConfigError> {
        self.set_override(keys::LOG_LEVEL, level)
    }

    /// `-f/--file`.
    pub fn with_output_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.set_override(keys::OUTPUT_FILE, path)
    }

    /// `--allow-errors`: write the document even when validation reports an ERROR.
    pub fn allow_errors(self) -> Result<Self, ConfigError> {
        self.set_override(keys::ABORT_ON_ERROR, false)
    }

    /// Sets one dotted key, e.g. `summary.list_sections`, above every file layer.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<MapperConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<MapperConfig, ConfigError> {
    Loader::new().build()
}
