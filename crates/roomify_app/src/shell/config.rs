use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use roomify_core::{SettingsError, UploadSettings};
use serde::Deserialize;
use thiserror::Error;

use super::logging::{LogOptions, LogTarget};

const DEFAULT_CONFIG_FILENAME: &str = "roomify.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Optional overrides, as written in `roomify.ron` or given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub tick_interval_ms: Option<u64>,
    pub progress_step: Option<u8>,
    pub redirect_delay_ms: Option<u64>,
    pub max_file_bytes: Option<u64>,
    pub route_prefix: Option<String>,
    pub log_target: Option<LogTarget>,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Everything the shell reads from `roomify.ron` and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellConfig {
    pub upload: UploadSettings,
    pub log: LogOptions,
    /// The settings file that was read, if any.
    pub source: Option<PathBuf>,
}

impl SettingsFile {
    fn apply(self, config: &mut ShellConfig) -> Result<(), ConfigError> {
        let settings = &mut config.upload;
        if let Some(ms) = self.tick_interval_ms {
            settings.tick_interval = Duration::from_millis(ms);
        }
        if let Some(step) = self.progress_step {
            settings.progress_step = step;
        }
        if let Some(ms) = self.redirect_delay_ms {
            settings.redirect_delay = Duration::from_millis(ms);
        }
        if let Some(bytes) = self.max_file_bytes {
            settings.max_file_bytes = bytes;
        }
        if let Some(prefix) = self.route_prefix {
            settings.route_prefix = prefix;
        }
        if let Some(target) = self.log_target {
            config.log.target = target;
        }
        if let Some(level) = self.log_level {
            config.log.level =
                LevelFilter::from_str(&level).map_err(|_| ConfigError::LogLevel(level))?;
        }
        if let Some(file) = self.log_file {
            config.log.file = file;
        }
        Ok(())
    }
}

/// Builds the effective configuration: defaults, then the settings file, then
/// command-line overrides.
///
/// Without an explicit path, `./roomify.ron` is read if it exists.
pub fn load_config(
    explicit: Option<&Path>,
    overrides: SettingsFile,
) -> Result<ShellConfig, ConfigError> {
    let mut config = ShellConfig::default();

    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    match fs::read_to_string(&path) {
        Ok(content) => {
            let file: SettingsFile = ron::from_str(&content).map_err(|source| {
                ConfigError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;
            file.apply(&mut config)?;
            config.source = Some(path);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {}
        Err(source) => return Err(ConfigError::Read { path, source }),
    }

    overrides.apply(&mut config)?;
    config.upload.validate()?;
    Ok(config)
}
