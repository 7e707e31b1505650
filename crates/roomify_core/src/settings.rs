use std::time::Duration;

use crate::progress::PROGRESS_COMPLETE;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_PROGRESS_STEP: u8 = 5;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 600;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_ROUTE_PREFIX: &str = "/visualizer";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("progress step must be between 1 and {PROGRESS_COMPLETE}, got {0}")]
    ProgressStep(u8),
    #[error("progress tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("maximum file size must be non-zero")]
    ZeroMaxFileBytes,
    #[error("route prefix must start with '/', got {0:?}")]
    RoutePrefix(String),
}

/// Timing and limits for the upload flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Period of the simulated progress timer.
    pub tick_interval: Duration,
    /// Amount added per tick; clamped at 100.
    pub progress_step: u8,
    /// Pause between reaching 100% and navigating.
    pub redirect_delay: Duration,
    /// Largest file the decoder will read.
    pub max_file_bytes: u64,
    /// Route the decoded image is handed to, without the id segment.
    pub route_prefix: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            progress_step: DEFAULT_PROGRESS_STEP,
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        }
    }
}

impl UploadSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.progress_step == 0 || self.progress_step > PROGRESS_COMPLETE {
            return Err(SettingsError::ProgressStep(self.progress_step));
        }
        if self.tick_interval.is_zero() {
            return Err(SettingsError::ZeroTickInterval);
        }
        if self.max_file_bytes == 0 {
            return Err(SettingsError::ZeroMaxFileBytes);
        }
        if !self.route_prefix.starts_with('/') {
            return Err(SettingsError::RoutePrefix(self.route_prefix.clone()));
        }
        Ok(())
    }

    /// Number of ticks needed to go from 0 to 100.
    pub fn ticks_to_complete(&self) -> u32 {
        let step = u32::from(self.progress_step.max(1));
        u32::from(PROGRESS_COMPLETE).div_ceil(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = UploadSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.ticks_to_complete(), 20);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut settings = UploadSettings {
            progress_step: 0,
            ..UploadSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::ProgressStep(0)));

        settings.progress_step = 101;
        assert_eq!(settings.validate(), Err(SettingsError::ProgressStep(101)));

        settings.progress_step = 30;
        assert_eq!(settings.ticks_to_complete(), 4);
        settings.tick_interval = Duration::ZERO;
        assert_eq!(settings.validate(), Err(SettingsError::ZeroTickInterval));

        let settings = UploadSettings {
            route_prefix: "visualizer".into(),
            ..UploadSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::RoutePrefix("visualizer".into()))
        );
    }
}
