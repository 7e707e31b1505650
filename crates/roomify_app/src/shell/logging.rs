use std::fs::File;
use std::io;
use std::path::PathBuf;

use log::{LevelFilter, SetLoggerError};
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

const DEFAULT_LOG_FILE: &str = "roomify.log";

/// Terminal lines are limited to targets under this prefix; the log file
/// also keeps lines from dependencies.
const TERMINAL_TARGET_PREFIX: &str = "roomify";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum LogTarget {
    /// Standard error, so progress output on stdout stays readable.
    #[default]
    Stderr,
    File,
    Both,
}

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("could not create log file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("logger already installed")]
    Install(#[from] SetLoggerError),
}

/// Where log lines go and how many of them, from `roomify.ron` and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub target: LogTarget,
    pub level: LevelFilter,
    pub file: PathBuf,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            target: LogTarget::default(),
            level: LevelFilter::Info,
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl LogOptions {
    /// `--verbose` raises the level to at least debug.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = self.level.max(LevelFilter::Debug);
        }
        self
    }

    fn loggers(&self) -> Result<Vec<Box<dyn SharedLogger>>, LogInitError> {
        let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
        if matches!(self.target, LogTarget::Stderr | LogTarget::Both) {
            loggers.push(TermLogger::new(
                self.level,
                terminal_config(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ));
        }
        if matches!(self.target, LogTarget::File | LogTarget::Both) {
            let file = File::create(&self.file).map_err(|source| LogInitError::File {
                path: self.file.clone(),
                source,
            })?;
            loggers.push(WriteLogger::new(self.level, file_config(), file));
        }
        Ok(loggers)
    }
}

pub fn initialize(options: &LogOptions) -> Result<(), LogInitError> {
    CombinedLogger::init(options.loggers()?)?;
    Ok(())
}

fn terminal_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .add_filter_allow_str(TERMINAL_TARGET_PREFIX)
        .build()
}

fn file_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
